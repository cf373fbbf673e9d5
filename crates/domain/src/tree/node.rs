//! Tree node types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{HttpMethod, Id};

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A folder; may have children.
    Folder,
    /// A request; never has children.
    Request,
}

/// Where a dragged node lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    /// Sibling, immediately before the target.
    Before,
    /// Sibling, immediately after the target.
    After,
    /// Last child of the target. Only meaningful for folder targets.
    Inside,
}

/// Bookkeeping attached to every node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last renamed or moved.
    pub updated_at: DateTime<Utc>,
    /// HTTP method shown next to request nodes.
    pub method: Option<HttpMethod>,
}

impl NodeMetadata {
    pub(crate) fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            method: None,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A folder or request node.
///
/// Either `parent_id` is `None` and the id is listed in the tree's root
/// ids, or `parent_id` names a folder whose `children` list the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique node id.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Folder or request.
    pub kind: NodeKind,
    /// Containing folder node, `None` at the root.
    pub parent_id: Option<Id>,
    /// Ordered child ids. Always empty for requests.
    pub children: Vec<Id>,
    /// Timestamps and display hints.
    pub metadata: NodeMetadata,
}

impl TreeNode {
    /// Returns true for folder nodes.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}
