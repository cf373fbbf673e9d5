//! Forward and reverse sync between saved items and tree nodes.

use std::collections::{HashMap, HashSet};

use reqx_domain::tree::CompletedDrop;
use reqx_domain::{DropPosition, Id, NodeKind, SavedRequestsStore, TreeState};

/// The saved item a tree node mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SavedRef {
    /// A saved folder id.
    Folder(Id),
    /// A saved request id.
    Request(Id),
}

impl SavedRef {
    /// The saved item's id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(id) | Self::Request(id) => id,
        }
    }
}

/// What one forward pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Nodes created for new saved items.
    pub added: usize,
    /// Nodes removed because their saved item disappeared.
    pub removed: usize,
    /// Existing nodes renamed or re-parented.
    pub updated: usize,
}

impl SyncReport {
    /// Returns true if the pass changed nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.updated == 0
    }
}

/// Keeps a [`TreeState`] mirroring a [`SavedRequestsStore`].
///
/// Holds the mapping between saved ids and node ids in both directions.
/// It is the only component that writes across the two representations.
#[derive(Debug, Clone, Default)]
pub struct TreeSync {
    folder_nodes: HashMap<Id, Id>,
    request_nodes: HashMap<Id, Id>,
    saved_by_node: HashMap<Id, SavedRef>,
    initialized: bool,
}

impl TreeSync {
    /// Creates an adapter with no mapping yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the first forward pass has run.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The saved item behind a node, if mapped.
    #[must_use]
    pub fn saved_ref(&self, node_id: &str) -> Option<&SavedRef> {
        self.saved_by_node.get(node_id)
    }

    /// The node mirroring a saved folder, if mapped.
    #[must_use]
    pub fn folder_node(&self, folder_id: &str) -> Option<&str> {
        self.folder_nodes.get(folder_id).map(String::as_str)
    }

    /// The node mirroring a saved request, if mapped.
    #[must_use]
    pub fn request_node(&self, request_id: &str) -> Option<&str> {
        self.request_nodes.get(request_id).map(String::as_str)
    }

    /// The saved folder behind a node, `None` if the node is not a
    /// mapped folder.
    #[must_use]
    pub fn saved_folder_id(&self, node_id: &str) -> Option<&str> {
        match self.saved_by_node.get(node_id)? {
            SavedRef::Folder(id) => Some(id),
            SavedRef::Request(_) => None,
        }
    }

    /// Drops every mapping. The next forward pass rebuilds the tree from
    /// scratch as if it were the first.
    pub fn reset(&mut self, tree: &mut TreeState) {
        *tree = TreeState::new();
        self.folder_nodes.clear();
        self.request_nodes.clear();
        self.saved_by_node.clear();
        self.initialized = false;
    }

    /// Brings the tree in line with the saved store.
    ///
    /// Creates nodes for new items (folders parent-first), refreshes
    /// names, methods and parents of the rest, removes nodes whose saved
    /// item is gone, then sorts every sibling list. Surviving items are
    /// moved out of deleted folders before those are removed, so they
    /// keep their node ids.
    pub fn forward_sync(&mut self, store: &SavedRequestsStore, tree: &mut TreeState) -> SyncReport {
        let mut report = SyncReport::default();
        let first_pass = !self.initialized;
        let existing: HashSet<Id> = tree.nodes().keys().cloned().collect();

        let mut touched_parents: Vec<Id> = Vec::new();
        report.added += self.add_folders(store, tree, &mut touched_parents);
        report.added += self.add_requests(store, tree, &mut touched_parents);
        report.updated = self.refresh_existing(store, tree, &mut touched_parents);

        report.removed = self.remove_stale(store, tree);
        // Survivors that could not leave a deleted subtree were unmapped.
        report.added += self.add_folders(store, tree, &mut touched_parents);
        report.added += self.add_requests(store, tree, &mut touched_parents);

        if first_pass {
            let with_children: Vec<Id> = tree
                .nodes()
                .values()
                .filter(|n| n.is_folder() && !n.children.is_empty())
                .map(|n| n.id.clone())
                .collect();
            for id in with_children {
                tree.expand(&id);
            }
        } else {
            for parent in touched_parents.iter().filter(|p| existing.contains(*p)) {
                tree.expand(parent);
            }
        }

        tree.sort_all();
        self.initialized = true;

        tracing::debug!(
            added = report.added,
            removed = report.removed,
            updated = report.updated,
            first_pass,
            "Tree synced from saved requests"
        );
        report
    }

    fn remove_stale(&mut self, store: &SavedRequestsStore, tree: &mut TreeState) -> usize {
        let mut removed = 0;

        let stale_nodes: Vec<Id> = self
            .saved_by_node
            .iter()
            .filter(|(_, saved)| match saved {
                SavedRef::Folder(id) => store.folder(id).is_none(),
                SavedRef::Request(id) => store.request(id).is_none(),
            })
            .map(|(node_id, _)| node_id.clone())
            .collect();
        for node_id in stale_nodes {
            removed += tree.delete_node(&node_id).len();
        }

        // A cascade may still take a survivor that refresh could not move;
        // unmapping it lets the add step recreate it.
        let saved_by_node = std::mem::take(&mut self.saved_by_node);
        self.saved_by_node = saved_by_node
            .into_iter()
            .filter(|(node_id, saved)| {
                tree.node(node_id).is_some()
                    && match saved {
                        SavedRef::Folder(id) => store.folder(id).is_some(),
                        SavedRef::Request(id) => store.request(id).is_some(),
                    }
            })
            .collect();
        let saved_by_node = &self.saved_by_node;
        self.folder_nodes.retain(|_, node| saved_by_node.contains_key(node));
        self.request_nodes.retain(|_, node| saved_by_node.contains_key(node));

        removed
    }

    fn add_folders(
        &mut self,
        store: &SavedRequestsStore,
        tree: &mut TreeState,
        touched_parents: &mut Vec<Id>,
    ) -> usize {
        let mut pending: Vec<Id> = store
            .folders()
            .iter()
            .filter(|f| !self.folder_nodes.contains_key(&f.id))
            .map(|f| f.id.clone())
            .collect();
        let mut added = 0;

        // Parent-first: a folder waits until its parent has a node.
        loop {
            let before = pending.len();
            pending.retain(|folder_id| {
                let Some(folder) = store.folder(folder_id) else {
                    return false;
                };
                let parent = folder
                    .parent_folder_id
                    .as_deref()
                    .filter(|p| store.folder(p).is_some());
                let parent_node = match parent {
                    None => None,
                    Some(p) => match self.folder_nodes.get(p) {
                        Some(node) => Some(node.clone()),
                        None => return true,
                    },
                };
                if self.attach_folder(tree, folder_id, &folder.name, parent_node.as_deref(), touched_parents) {
                    added += 1;
                }
                false
            });
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        // Only a parent cycle in the stored data gets here.
        for folder_id in pending {
            let Some(folder) = store.folder(&folder_id) else {
                continue;
            };
            tracing::warn!(folder_id = %folder_id, "Folder parent chain is cyclic, placing it at root");
            if self.attach_folder(tree, &folder_id, &folder.name, None, touched_parents) {
                added += 1;
            }
        }

        added
    }

    fn attach_folder(
        &mut self,
        tree: &mut TreeState,
        folder_id: &str,
        name: &str,
        parent_node: Option<&str>,
        touched_parents: &mut Vec<Id>,
    ) -> bool {
        let Some(node_id) = tree.create_node(parent_node, NodeKind::Folder, name) else {
            tracing::warn!(folder_id = %folder_id, "Could not create folder node");
            return false;
        };
        if let Some(parent) = parent_node {
            touched_parents.push(parent.to_string());
        }
        self.map(node_id, SavedRef::Folder(folder_id.to_string()));
        true
    }

    fn add_requests(
        &mut self,
        store: &SavedRequestsStore,
        tree: &mut TreeState,
        touched_parents: &mut Vec<Id>,
    ) -> usize {
        let mut added = 0;
        for request in store.requests() {
            if self.request_nodes.contains_key(&request.id) {
                continue;
            }
            let parent_node = self.request_parent_node(store, &request.id);
            let Some(node_id) = tree.create_node(parent_node.as_deref(), NodeKind::Request, &request.name) else {
                tracing::warn!(request_id = %request.id, "Could not create request node");
                continue;
            };
            tree.set_node_method(&node_id, request.method);
            if let Some(parent) = parent_node {
                touched_parents.push(parent);
            }
            self.map(node_id, SavedRef::Request(request.id.clone()));
            added += 1;
        }
        added
    }

    fn refresh_existing(
        &mut self,
        store: &SavedRequestsStore,
        tree: &mut TreeState,
        touched_parents: &mut Vec<Id>,
    ) -> usize {
        let mut updated = 0;
        let mapped: Vec<(Id, SavedRef)> = self
            .saved_by_node
            .iter()
            .map(|(node, saved)| (node.clone(), saved.clone()))
            .collect();

        for (node_id, saved) in mapped {
            let (name, method, parent_node) = match &saved {
                SavedRef::Folder(id) => {
                    let Some(folder) = store.folder(id) else {
                        continue;
                    };
                    let parent = folder
                        .parent_folder_id
                        .as_deref()
                        .and_then(|p| self.folder_nodes.get(p))
                        .cloned();
                    (folder.name.clone(), None, parent)
                }
                SavedRef::Request(id) => {
                    let Some(request) = store.request(id) else {
                        continue;
                    };
                    (
                        request.name.clone(),
                        Some(request.method),
                        self.request_parent_node(store, id),
                    )
                }
            };
            let Some(node) = tree.node(&node_id) else {
                continue;
            };
            let renamed = node.name != name;
            let moved = node.parent_id != parent_node;
            let method_changed = method.is_some() && node.metadata.method != method;

            if renamed {
                tree.rename_node(&node_id, name);
            }
            if let Some(method) = method.filter(|_| method_changed) {
                tree.set_node_method(&node_id, method);
            }
            if moved {
                if tree.reparent_node(&node_id, parent_node.as_deref()) {
                    if let Some(parent) = parent_node {
                        touched_parents.push(parent);
                    }
                } else {
                    tracing::warn!(node_id = %node_id, "Saved parent would create a cycle, keeping node in place");
                }
            }
            if renamed || moved || method_changed {
                updated += 1;
            }
        }
        updated
    }

    fn request_parent_node(&self, store: &SavedRequestsStore, request_id: &str) -> Option<Id> {
        store
            .folder_of_request(request_id)
            .and_then(|f| self.folder_nodes.get(&f.id))
            .cloned()
    }

    fn map(&mut self, node_id: Id, saved: SavedRef) {
        match &saved {
            SavedRef::Folder(id) => self.folder_nodes.insert(id.clone(), node_id.clone()),
            SavedRef::Request(id) => self.request_nodes.insert(id.clone(), node_id.clone()),
        };
        self.saved_by_node.insert(node_id, saved);
    }

    /// Applies a tree rename to the saved item behind `node_id`.
    ///
    /// A missing mapping is a benign race and leaves the store untouched.
    pub fn reverse_rename(&self, store: &mut SavedRequestsStore, node_id: &str, name: &str) -> bool {
        let applied = match self.saved_by_node.get(node_id) {
            Some(SavedRef::Folder(id)) => store.update_folder(id, name),
            Some(SavedRef::Request(id)) => store.rename_request(id, name),
            None => {
                tracing::warn!(node_id, "Rename on an unmapped node ignored");
                return false;
            }
        };
        tracing::trace!(node_id, name, applied, "Reverse-synced rename");
        applied
    }

    /// Deletes the saved item behind `node_id`, cascading for folders.
    pub fn reverse_delete(&self, store: &mut SavedRequestsStore, node_id: &str) -> bool {
        let applied = match self.saved_by_node.get(node_id) {
            Some(SavedRef::Folder(id)) => store.delete_folder(id).is_some(),
            Some(SavedRef::Request(id)) => store.delete_request(id),
            None => {
                tracing::warn!(node_id, "Delete on an unmapped node ignored");
                return false;
            }
        };
        tracing::trace!(node_id, applied, "Reverse-synced delete");
        applied
    }

    /// Records a committed tree move in the saved store.
    ///
    /// `Inside` on a folder target means containment in that folder;
    /// anything else means joining the target's container, the root when
    /// the target is a root node.
    pub fn reverse_move(&self, store: &mut SavedRequestsStore, tree: &TreeState, drop: &CompletedDrop) -> bool {
        let Some(saved) = self.saved_by_node.get(&drop.node_id) else {
            tracing::warn!(node_id = %drop.node_id, "Move of an unmapped node ignored");
            return false;
        };
        let Some(target) = tree.node(&drop.target_id) else {
            tracing::warn!(target_id = %drop.target_id, "Move onto an unknown node ignored");
            return false;
        };

        let container_node = if drop.position == DropPosition::Inside && target.is_folder() {
            Some(target.id.as_str())
        } else {
            target.parent_id.as_deref()
        };
        let container = match container_node {
            None => None,
            Some(node) => match self.saved_folder_id(node) {
                Some(folder_id) => Some(folder_id),
                None => {
                    tracing::warn!(node_id = node, "Move into an unmapped folder ignored");
                    return false;
                }
            },
        };

        let applied = match saved {
            SavedRef::Request(id) => store.move_request_to_folder(id, container),
            SavedRef::Folder(id) => match store.move_folder_to_folder(id, container) {
                Ok(applied) => applied,
                Err(error) => {
                    tracing::warn!(%error, "Rejected folder move");
                    false
                }
            },
        };
        tracing::trace!(node_id = %drop.node_id, ?container, applied, "Reverse-synced move");
        applied
    }
}
