//! Flattened rows for rendering.

use super::node::NodeKind;
use super::state::TreeState;
use crate::persistence::{HttpMethod, Id};

/// One visible line of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Node id.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Folder or request.
    pub kind: NodeKind,
    /// Nesting depth for indentation, 0 at the root.
    pub depth: u32,
    /// Whether the folder is expanded.
    pub expanded: bool,
    /// Whether the folder has any children.
    pub has_children: bool,
    /// Method badge for requests.
    pub method: Option<HttpMethod>,
    /// Whether the row is selected.
    pub selected: bool,
}

impl TreeState {
    /// Flattens the tree into rows, descending only into expanded folders.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.push_rows(&self.root_ids, 0, &mut rows);
        rows
    }

    fn push_rows(&self, ids: &[Id], depth: u32, rows: &mut Vec<TreeRow>) {
        for id in ids {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let expanded = self.expanded_ids.contains(id);

            rows.push(TreeRow {
                id: id.clone(),
                name: node.name.clone(),
                kind: node.kind,
                depth,
                expanded,
                has_children: !node.children.is_empty(),
                method: node.metadata.method,
                selected: self.selected_ids.contains(id),
            });

            if expanded {
                self.push_rows(&node.children, depth + 1, rows);
            }
        }
    }
}
