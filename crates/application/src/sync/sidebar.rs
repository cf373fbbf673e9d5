//! The sidebar session: saved store, tree and sync adapter in one place.

use reqx_domain::tree::CompletedDrop;
use reqx_domain::{
    DropPosition, Id, SavedRequest, SavedRequestsSnapshot, SavedRequestsStore, TreeRow, TreeState,
};

use super::adapter::{SavedRef, SyncReport, TreeSync};

/// Owns the saved requests store, the tree mirroring it and the adapter
/// between them.
///
/// UI code holds one `Sidebar` and calls its actions instead of reaching
/// into either store. Tree-originated edits are written to the saved
/// store first and the tree is then refreshed from it, so the saved store
/// stays the single source of truth.
#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    store: SavedRequestsStore,
    tree: TreeState,
    sync: TreeSync,
}

impl Sidebar {
    /// Builds the tree for `store`.
    #[must_use]
    pub fn new(store: SavedRequestsStore) -> Self {
        let mut sidebar = Self {
            store,
            tree: TreeState::new(),
            sync: TreeSync::new(),
        };
        sidebar.refresh();
        sidebar
    }

    /// Builds the tree for a loaded snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: SavedRequestsSnapshot) -> Self {
        Self::new(SavedRequestsStore::from_snapshot(snapshot))
    }

    /// The saved store.
    #[must_use]
    pub const fn store(&self) -> &SavedRequestsStore {
        &self.store
    }

    /// The tree.
    #[must_use]
    pub const fn tree(&self) -> &TreeState {
        &self.tree
    }

    /// The mapping between nodes and saved items.
    #[must_use]
    pub const fn sync(&self) -> &TreeSync {
        &self.sync
    }

    /// Consumes the sidebar and returns the saved store.
    #[must_use]
    pub fn into_store(self) -> SavedRequestsStore {
        self.store
    }

    /// Snapshot of the saved store for persistence.
    #[must_use]
    pub fn snapshot(&self) -> SavedRequestsSnapshot {
        self.store.snapshot()
    }

    /// Flattened rows of the expanded tree.
    #[must_use]
    pub fn rows(&self) -> Vec<TreeRow> {
        self.tree.visible_rows()
    }

    /// Runs a forward sync pass.
    pub fn refresh(&mut self) -> SyncReport {
        self.sync.forward_sync(&self.store, &mut self.tree)
    }

    /// Mutates the saved store directly, then refreshes the tree.
    pub fn update_store<R>(&mut self, f: impl FnOnce(&mut SavedRequestsStore) -> R) -> R {
        let result = f(&mut self.store);
        self.refresh();
        result
    }

    /// Creates a folder under the folder node `parent_node`, or at root.
    ///
    /// Returns the new node id. `None` if `parent_node` is given but is
    /// not a mapped folder.
    pub fn create_folder(&mut self, name: &str, parent_node: Option<&str>) -> Option<Id> {
        let parent = self.parent_folder(parent_node)?;
        let folder_id = self.store.add_folder(name, parent.as_deref());
        self.refresh();
        self.sync.folder_node(&folder_id).map(str::to_string)
    }

    /// Saves a request under the folder node `parent_node`, or at root.
    ///
    /// Returns the new node id.
    pub fn create_request(&mut self, request: SavedRequest, parent_node: Option<&str>) -> Option<Id> {
        let parent = self.parent_folder(parent_node)?;
        let request_id = self.store.add_request(request, parent.as_deref());
        self.refresh();
        self.sync.request_node(&request_id).map(str::to_string)
    }

    fn parent_folder(&self, parent_node: Option<&str>) -> Option<Option<Id>> {
        match parent_node {
            None => Some(None),
            Some(node) => self.sync.saved_folder_id(node).map(|id| Some(id.to_string())),
        }
    }

    /// Replaces a saved request's content, keyed by its id.
    pub fn update_request(&mut self, request: SavedRequest) -> bool {
        let updated = self.store.update_request(request);
        if updated {
            self.refresh();
        }
        updated
    }

    /// Deletes a node, its descendants and the saved items behind them.
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        if self.tree.node(node_id).is_none() {
            return false;
        }
        self.sync.reverse_delete(&mut self.store, node_id);
        self.tree.delete_node(node_id);
        self.refresh();
        true
    }

    /// Enters inline rename mode.
    pub fn start_editing(&mut self, node_id: &str) -> bool {
        self.tree.start_editing(node_id)
    }

    /// Leaves rename mode and renames the node and its saved item.
    ///
    /// A blank name ends editing without renaming.
    pub fn end_editing(&mut self, name: &str) -> bool {
        let Some((node_id, name)) = self.tree.end_editing(name) else {
            return false;
        };
        self.sync.reverse_rename(&mut self.store, &node_id, &name);
        self.refresh();
        true
    }

    /// Leaves rename mode without renaming.
    pub fn cancel_editing(&mut self) {
        self.tree.cancel_editing();
    }

    /// Moves a node relative to `target_id` and records it in the store.
    pub fn move_node(&mut self, node_id: &str, target_id: &str, position: DropPosition) -> bool {
        if !self.tree.move_node(node_id, target_id, position) {
            return false;
        }
        self.commit_move(&CompletedDrop {
            node_id: node_id.to_string(),
            target_id: target_id.to_string(),
            position,
        });
        true
    }

    /// Starts dragging a node.
    pub fn start_drag(&mut self, node_id: &str) -> bool {
        self.tree.start_drag(node_id)
    }

    /// Records the hovered drop target, `None` to clear it.
    pub fn update_drop_target(&mut self, target: Option<(&str, DropPosition)>) {
        self.tree.update_drop_target(target);
    }

    /// Returns true if the dragged node may be dropped on `target_id`.
    #[must_use]
    pub fn can_drop_on(&self, target_id: &str) -> bool {
        self.tree.can_drop_on(target_id)
    }

    /// Commits the drag and records the move in the store.
    pub fn complete_drop(&mut self) -> Option<CompletedDrop> {
        let drop = self.tree.complete_drop()?;
        self.commit_move(&drop);
        Some(drop)
    }

    /// Abandons the current drag.
    pub fn cancel_drag(&mut self) {
        self.tree.cancel_drag();
    }

    fn commit_move(&mut self, drop: &CompletedDrop) {
        self.sync.reverse_move(&mut self.store, &self.tree, drop);
        // Puts the node back if the store refused the move.
        self.refresh();
    }

    /// Toggles a folder open or closed.
    pub fn toggle_node(&mut self, node_id: &str) {
        self.tree.toggle_node(node_id);
    }

    /// Expands every folder.
    pub fn expand_all(&mut self) {
        self.tree.expand_all();
    }

    /// Collapses every folder.
    pub fn collapse_all(&mut self) {
        self.tree.collapse_all();
    }

    /// Selects a node, adding to the selection when `additive`.
    pub fn select_node(&mut self, node_id: &str, additive: bool) {
        self.tree.select_node(node_id, additive);
    }

    /// Moves keyboard focus.
    pub fn focus_node(&mut self, node_id: Option<&str>) {
        self.tree.focus_node(node_id);
    }

    /// The saved request behind a node, if it is a request node.
    #[must_use]
    pub fn request_for_node(&self, node_id: &str) -> Option<&SavedRequest> {
        match self.sync.saved_ref(node_id)? {
            SavedRef::Request(id) => self.store.request(id),
            SavedRef::Folder(_) => None,
        }
    }
}
