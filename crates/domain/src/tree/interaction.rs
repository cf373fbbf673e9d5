//! Expansion, selection, inline editing and drag-and-drop state.

use std::collections::HashSet;

use super::node::DropPosition;
use super::state::TreeState;
use crate::persistence::Id;

/// A drop that was committed by [`TreeState::complete_drop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDrop {
    /// The node that moved.
    pub node_id: Id,
    /// The node it was dropped on.
    pub target_id: Id,
    /// Where it landed relative to the target.
    pub position: DropPosition,
}

impl TreeState {
    /// Ids of expanded folders.
    #[must_use]
    pub const fn expanded_ids(&self) -> &HashSet<Id> {
        &self.expanded_ids
    }

    /// Returns true if the node is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_ids.contains(id)
    }

    /// Flips a folder between expanded and collapsed.
    pub fn toggle_node(&mut self, id: &str) {
        if !self.expanded_ids.remove(id) && self.node(id).is_some_and(|n| n.is_folder()) {
            self.expanded_ids.insert(id.to_string());
        }
    }

    /// Expands a folder. Returns false for unknown ids and requests.
    pub fn expand(&mut self, id: &str) -> bool {
        if self.node(id).is_some_and(|n| n.is_folder()) {
            self.expanded_ids.insert(id.to_string());
            true
        } else {
            false
        }
    }

    /// Collapses a folder.
    pub fn collapse(&mut self, id: &str) {
        self.expanded_ids.remove(id);
    }

    /// Expands every folder.
    pub fn expand_all(&mut self) {
        let folders: Vec<Id> = self
            .nodes
            .values()
            .filter(|n| n.is_folder())
            .map(|n| n.id.clone())
            .collect();
        self.expanded_ids.extend(folders);
    }

    /// Collapses every folder.
    pub fn collapse_all(&mut self) {
        self.expanded_ids.clear();
    }

    /// Currently selected ids, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> &[Id] {
        &self.selected_ids
    }

    /// Selects a node. With `additive`, toggles it within the current
    /// selection; otherwise it becomes the only selected node. The
    /// selected node also takes focus.
    pub fn select_node(&mut self, id: &str, additive: bool) {
        if self.node(id).is_none() {
            return;
        }
        if additive {
            if let Some(index) = self.selected_ids.iter().position(|s| s == id) {
                self.selected_ids.remove(index);
            } else {
                self.selected_ids.push(id.to_string());
            }
        } else {
            self.selected_ids = vec![id.to_string()];
        }
        self.focused_id = Some(id.to_string());
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    /// The focused node, if any.
    #[must_use]
    pub fn focused_id(&self) -> Option<&str> {
        self.focused_id.as_deref()
    }

    /// Moves keyboard focus. Unknown ids clear focus.
    pub fn focus_node(&mut self, id: Option<&str>) {
        self.focused_id = id.filter(|id| self.node(id).is_some()).map(str::to_string);
    }

    /// The node being renamed inline, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    /// Enters inline rename mode for a node.
    pub fn start_editing(&mut self, id: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        self.editing_id = Some(id.to_string());
        true
    }

    /// Leaves rename mode, renaming the node if `name` is not blank.
    ///
    /// Returns the renamed node id and the trimmed name when a rename
    /// was applied.
    pub fn end_editing(&mut self, name: &str) -> Option<(Id, String)> {
        let id = self.editing_id.take()?;
        let name = name.trim();
        if name.is_empty() || !self.rename_node(&id, name) {
            return None;
        }
        Some((id, name.to_string()))
    }

    /// Leaves rename mode without renaming.
    pub fn cancel_editing(&mut self) {
        self.editing_id = None;
    }

    /// The node being dragged, if any.
    #[must_use]
    pub fn dragged_id(&self) -> Option<&str> {
        self.dragged_id.as_deref()
    }

    /// The current drop target and position, if any.
    #[must_use]
    pub fn drop_target(&self) -> Option<(&str, DropPosition)> {
        self.drop_target_id.as_deref().zip(self.drop_position)
    }

    /// Starts dragging a node.
    pub fn start_drag(&mut self, id: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        self.dragged_id = Some(id.to_string());
        self.drop_target_id = None;
        self.drop_position = None;
        true
    }

    /// Records the hovered target. `None` clears it.
    pub fn update_drop_target(&mut self, target: Option<(&str, DropPosition)>) {
        if self.dragged_id.is_none() {
            return;
        }
        match target {
            Some((id, position)) if self.node(id).is_some() => {
                self.drop_target_id = Some(id.to_string());
                self.drop_position = Some(position);
            }
            _ => {
                self.drop_target_id = None;
                self.drop_position = None;
            }
        }
    }

    /// Returns true if dropping the dragged node on `target_id` is allowed.
    #[must_use]
    pub fn can_drop_on(&self, target_id: &str) -> bool {
        self.dragged_id
            .as_deref()
            .is_some_and(|dragged| dragged != target_id && !self.is_descendant(dragged, target_id))
    }

    /// Commits the drag with the last known target and position, then
    /// returns to idle.
    ///
    /// A no-op unless dragged node, target and position are all set.
    /// Returns the drop only if the move was applied.
    pub fn complete_drop(&mut self) -> Option<CompletedDrop> {
        if self.dragged_id.is_none() || self.drop_target_id.is_none() || self.drop_position.is_none() {
            return None;
        }
        let node_id = self.dragged_id.take()?;
        let target_id = self.drop_target_id.take()?;
        let position = self.drop_position.take()?;

        self.move_node(&node_id, &target_id, position).then_some(CompletedDrop {
            node_id,
            target_id,
            position,
        })
    }

    /// Abandons the current drag.
    pub fn cancel_drag(&mut self) {
        self.dragged_id = None;
        self.drop_target_id = None;
        self.drop_position = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    fn tree_with(names: &[(&str, NodeKind)]) -> (TreeState, Vec<Id>) {
        let mut tree = TreeState::new();
        let ids = names
            .iter()
            .map(|(name, kind)| tree.create_node(None, *kind, *name).unwrap())
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_toggle_only_expands_folders() {
        let (mut tree, ids) = tree_with(&[("F", NodeKind::Folder), ("r", NodeKind::Request)]);

        tree.toggle_node(&ids[0]);
        assert!(tree.is_expanded(&ids[0]));
        tree.toggle_node(&ids[0]);
        assert!(!tree.is_expanded(&ids[0]));

        tree.toggle_node(&ids[1]);
        assert!(!tree.is_expanded(&ids[1]));
        assert!(!tree.expand(&ids[1]));
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let (mut tree, ids) = tree_with(&[("A", NodeKind::Folder), ("B", NodeKind::Folder)]);
        tree.expand_all();
        assert_eq!(tree.expanded_ids().len(), 2);
        tree.collapse(&ids[0]);
        assert!(!tree.is_expanded(&ids[0]));
        tree.collapse_all();
        assert!(tree.expanded_ids().is_empty());
    }

    #[test]
    fn test_selection_single_and_additive() {
        let (mut tree, ids) = tree_with(&[("a", NodeKind::Request), ("b", NodeKind::Request)]);

        tree.select_node(&ids[0], false);
        tree.select_node(&ids[1], true);
        assert_eq!(tree.selected_ids(), &ids[..]);
        assert_eq!(tree.focused_id(), Some(ids[1].as_str()));

        tree.select_node(&ids[0], true);
        assert_eq!(tree.selected_ids(), &ids[1..]);

        tree.select_node(&ids[0], false);
        assert_eq!(tree.selected_ids(), &ids[..1]);

        tree.select_node("missing", false);
        assert_eq!(tree.selected_ids(), &ids[..1]);
    }

    #[test]
    fn test_focus_unknown_clears() {
        let (mut tree, ids) = tree_with(&[("a", NodeKind::Request)]);
        tree.focus_node(Some(ids[0].as_str()));
        assert_eq!(tree.focused_id(), Some(ids[0].as_str()));
        tree.focus_node(Some("missing"));
        assert_eq!(tree.focused_id(), None);
    }

    #[test]
    fn test_editing_lifecycle() {
        let (mut tree, ids) = tree_with(&[("old", NodeKind::Request)]);

        assert!(tree.start_editing(&ids[0]));
        assert_eq!(tree.end_editing("  new  "), Some((ids[0].clone(), "new".to_string())));
        assert_eq!(tree.node(&ids[0]).unwrap().name, "new");
        assert_eq!(tree.editing_id(), None);

        assert!(tree.start_editing(&ids[0]));
        assert_eq!(tree.end_editing("   "), None);
        assert_eq!(tree.node(&ids[0]).unwrap().name, "new");
        assert_eq!(tree.editing_id(), None);

        assert_eq!(tree.end_editing("ignored"), None);
    }

    #[test]
    fn test_drag_lifecycle() {
        let (mut tree, ids) = tree_with(&[("F", NodeKind::Folder), ("r", NodeKind::Request)]);

        assert!(tree.start_drag(&ids[1]));
        tree.update_drop_target(Some((ids[0].as_str(), DropPosition::Before)));
        tree.update_drop_target(Some((ids[0].as_str(), DropPosition::Inside)));
        assert_eq!(tree.drop_target(), Some((ids[0].as_str(), DropPosition::Inside)));

        let drop = tree.complete_drop().unwrap();
        assert_eq!(drop.node_id, ids[1]);
        assert_eq!(drop.position, DropPosition::Inside);
        assert_eq!(tree.node(&ids[1]).unwrap().parent_id, Some(ids[0].clone()));
        assert_eq!(tree.dragged_id(), None);
        assert_eq!(tree.drop_target(), None);
    }

    #[test]
    fn test_complete_drop_requires_full_state() {
        let (mut tree, ids) = tree_with(&[("F", NodeKind::Folder), ("r", NodeKind::Request)]);

        assert!(tree.complete_drop().is_none());

        tree.start_drag(&ids[1]);
        assert!(tree.complete_drop().is_none());
        assert_eq!(tree.dragged_id(), Some(ids[1].as_str()));

        tree.update_drop_target(Some(("missing", DropPosition::Inside)));
        assert!(tree.complete_drop().is_none());

        tree.cancel_drag();
        assert_eq!(tree.dragged_id(), None);
    }

    #[test]
    fn test_cyclic_drop_is_rejected_and_resets() {
        let mut tree = TreeState::new();
        let a = tree.create_node(None, NodeKind::Folder, "A").unwrap();
        let b = tree.create_node(Some(a.as_str()), NodeKind::Folder, "B").unwrap();

        tree.start_drag(&a);
        assert!(!tree.can_drop_on(&b));
        tree.update_drop_target(Some((b.as_str(), DropPosition::Inside)));
        assert!(tree.complete_drop().is_none());
        assert_eq!(tree.dragged_id(), None);
        assert_eq!(tree.node(&b).unwrap().parent_id, Some(a));
    }

    #[test]
    fn test_delete_clears_ui_state() {
        let (mut tree, ids) = tree_with(&[("F", NodeKind::Folder)]);
        tree.expand(&ids[0]);
        tree.select_node(&ids[0], false);
        tree.start_editing(&ids[0]);
        tree.start_drag(&ids[0]);

        tree.delete_node(&ids[0]);

        assert!(tree.expanded_ids().is_empty());
        assert!(tree.selected_ids().is_empty());
        assert_eq!(tree.focused_id(), None);
        assert_eq!(tree.editing_id(), None);
        assert_eq!(tree.dragged_id(), None);
    }
}
