//! Tree state and structural operations.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::node::{DropPosition, NodeKind, NodeMetadata, TreeNode};
use crate::id::generate_id;
use crate::persistence::{HttpMethod, Id};

/// The sidebar tree plus its UI-adjacent state.
///
/// Only `nodes` and `root_ids` carry structure; the remaining fields track
/// expansion, selection, focus, inline editing and drag-and-drop. Every
/// structural operation is a no-op when it references an unknown node.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    pub(super) nodes: HashMap<Id, TreeNode>,
    pub(super) root_ids: Vec<Id>,
    pub(super) expanded_ids: HashSet<Id>,
    pub(super) selected_ids: Vec<Id>,
    pub(super) focused_id: Option<Id>,
    pub(super) editing_id: Option<Id>,
    pub(super) dragged_id: Option<Id>,
    pub(super) drop_target_id: Option<Id>,
    pub(super) drop_position: Option<DropPosition>,
}

impl TreeState {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes keyed by id.
    #[must_use]
    pub const fn nodes(&self) -> &HashMap<Id, TreeNode> {
        &self.nodes
    }

    /// Ordered root ids.
    #[must_use]
    pub fn root_ids(&self) -> &[Id] {
        &self.root_ids
    }

    /// Looks a node up by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ordered children of `parent_id`, or the roots for `None`.
    #[must_use]
    pub fn children_of(&self, parent_id: Option<&str>) -> &[Id] {
        match parent_id {
            None => &self.root_ids,
            Some(id) => self.nodes.get(id).map_or(&[][..], |n| n.children.as_slice()),
        }
    }

    fn siblings_mut(&mut self, parent_id: Option<&str>) -> Option<&mut Vec<Id>> {
        match parent_id {
            None => Some(&mut self.root_ids),
            Some(id) => self.nodes.get_mut(id).map(|n| &mut n.children),
        }
    }

    /// Creates a node and appends it to its parent (or the roots).
    ///
    /// Returns `None` without changing anything if the parent does not
    /// exist or is a request.
    pub fn create_node(&mut self, parent_id: Option<&str>, kind: NodeKind, name: impl Into<String>) -> Option<Id> {
        if let Some(parent) = parent_id
            && !self.nodes.get(parent).is_some_and(TreeNode::is_folder)
        {
            return None;
        }

        let id = generate_id();
        self.siblings_mut(parent_id)?.push(id.clone());
        self.nodes.insert(
            id.clone(),
            TreeNode {
                id: id.clone(),
                name: name.into(),
                kind,
                parent_id: parent_id.map(str::to_string),
                children: Vec::new(),
                metadata: NodeMetadata::now(),
            },
        );
        Some(id)
    }

    /// Sets the HTTP method shown on a request node.
    pub fn set_node_method(&mut self, id: &str, method: HttpMethod) -> bool {
        self.nodes
            .get_mut(id)
            .filter(|n| n.kind == NodeKind::Request)
            .map(|n| n.metadata.method = Some(method))
            .is_some()
    }

    /// Renames a node. Returns false if it does not exist.
    pub fn rename_node(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.nodes
            .get_mut(id)
            .map(|n| {
                n.name = name.into();
                n.metadata.touch();
            })
            .is_some()
    }

    /// Deletes a node and all its descendants.
    ///
    /// Returns the removed ids, the node itself first. Empty if the node
    /// does not exist. UI state pointing at removed nodes is cleared.
    pub fn delete_node(&mut self, id: &str) -> Vec<Id> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let parent_id = node.parent_id.clone();

        let removed = self.descendants_inclusive(id);
        for removed_id in &removed {
            self.nodes.remove(removed_id);
        }
        if let Some(siblings) = self.siblings_mut(parent_id.as_deref()) {
            siblings.retain(|s| s != id);
        }
        self.forget(&removed);
        removed
    }

    /// Ids of `id` and everything below it, pre-order.
    #[must_use]
    pub fn descendants_inclusive(&self, id: &str) -> Vec<Id> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
                out.push(current);
            }
        }
        out
    }

    fn forget(&mut self, removed: &[Id]) {
        let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
        let gone = |slot: &Option<Id>| slot.as_deref().is_some_and(|id| removed.contains(id));

        self.expanded_ids.retain(|id| !removed.contains(id.as_str()));
        self.selected_ids.retain(|id| !removed.contains(id.as_str()));
        if gone(&self.focused_id) {
            self.focused_id = None;
        }
        if gone(&self.editing_id) {
            self.editing_id = None;
        }
        if gone(&self.dragged_id) || gone(&self.drop_target_id) {
            self.dragged_id = None;
            self.drop_target_id = None;
            self.drop_position = None;
        }
    }

    /// Returns true if `id` lies strictly below `ancestor_id`.
    #[must_use]
    pub fn is_descendant(&self, ancestor_id: &str, id: &str) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent_id.as_deref());
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor_id {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.nodes.get(parent).and_then(|n| n.parent_id.as_deref());
        }
        false
    }

    /// Ids from the root down to `id`, inclusive. Empty if unknown.
    #[must_use]
    pub fn path_to(&self, id: &str) -> Vec<Id> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            path.push(node.id.clone());
            if path.len() > self.nodes.len() {
                break;
            }
            current = node.parent_id.as_deref().and_then(|p| self.nodes.get(p));
        }
        path.reverse();
        path
    }

    /// Relocates a node relative to `target_id`.
    ///
    /// `Inside` on a folder appends the node to the folder's children.
    /// `Before`/`After`, or `Inside` on a request, make the node a sibling of
    /// the target at the adjacent index.
    ///
    /// Returns false without changing anything if either node is unknown,
    /// or if the move would put the node inside itself or its own subtree.
    pub fn move_node(&mut self, node_id: &str, target_id: &str, position: DropPosition) -> bool {
        let (Some(node), Some(target)) = (self.nodes.get(node_id), self.nodes.get(target_id)) else {
            return false;
        };
        if node_id == target_id || self.is_descendant(node_id, target_id) {
            return false;
        }
        let old_parent = node.parent_id.clone();
        let into_target = position == DropPosition::Inside && target.is_folder();
        let new_parent = if into_target {
            Some(target_id.to_string())
        } else {
            target.parent_id.clone()
        };

        if let Some(siblings) = self.siblings_mut(old_parent.as_deref()) {
            siblings.retain(|s| s != node_id);
        }

        let Some(siblings) = self.siblings_mut(new_parent.as_deref()) else {
            return false;
        };
        if into_target {
            siblings.push(node_id.to_string());
        } else {
            let anchor = siblings.iter().position(|s| s == target_id).unwrap_or(siblings.len());
            let index = if position == DropPosition::Before { anchor } else { (anchor + 1).min(siblings.len()) };
            siblings.insert(index, node_id.to_string());
        }

        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent_id = new_parent;
            node.metadata.touch();
        }
        true
    }

    /// Re-parents a node at the end of `parent_id`'s children (or the roots).
    ///
    /// Used when the containing folder changed outside the tree. Same
    /// guards as [`TreeState::move_node`].
    pub fn reparent_node(&mut self, node_id: &str, parent_id: Option<&str>) -> bool {
        if let Some(parent) = parent_id
            && (!self.nodes.get(parent).is_some_and(TreeNode::is_folder)
                || parent == node_id
                || self.is_descendant(node_id, parent))
        {
            return false;
        }
        let Some(node) = self.nodes.get(node_id) else {
            return false;
        };
        let old_parent = node.parent_id.clone();
        if old_parent.as_deref() == parent_id {
            return true;
        }
        if let Some(siblings) = self.siblings_mut(old_parent.as_deref()) {
            siblings.retain(|s| s != node_id);
        }
        if let Some(siblings) = self.siblings_mut(parent_id) {
            siblings.push(node_id.to_string());
        }
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent_id = parent_id.map(str::to_string);
            node.metadata.touch();
        }
        true
    }

    /// Sorts the roots and every folder's children: folders before
    /// requests, each group by case-insensitive name.
    pub fn sort_all(&mut self) {
        let mut roots = std::mem::take(&mut self.root_ids);
        self.sort_ids(&mut roots);
        self.root_ids = roots;

        let folder_ids: Vec<Id> = self
            .nodes
            .values()
            .filter(|n| n.is_folder())
            .map(|n| n.id.clone())
            .collect();
        for id in folder_ids {
            let Some(mut children) = self.nodes.get_mut(&id).map(|n| std::mem::take(&mut n.children)) else {
                continue;
            };
            self.sort_ids(&mut children);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children = children;
            }
        }
    }

    fn sort_ids(&self, ids: &mut [Id]) {
        ids.sort_by(|a, b| match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(a), Some(b)) => compare_nodes(a, b),
            _ => Ordering::Equal,
        });
    }

    /// Checks the parent/children invariant across the whole tree.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut listed = 0;
        for id in &self.root_ids {
            if !self.nodes.get(id).is_some_and(|n| n.parent_id.is_none()) {
                return false;
            }
            listed += 1;
        }
        for node in self.nodes.values() {
            if node.kind == NodeKind::Request && !node.children.is_empty() {
                return false;
            }
            for child in &node.children {
                if !self.nodes.get(child).is_some_and(|c| c.parent_id.as_deref() == Some(node.id.as_str())) {
                    return false;
                }
                listed += 1;
            }
        }
        listed == self.nodes.len()
    }
}

fn kind_rank(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Folder => 0,
        NodeKind::Request => 1,
    }
}

fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    kind_rank(a.kind)
        .cmp(&kind_rank(b.kind))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
