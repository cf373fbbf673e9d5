//! Saved requests store.
//!
//! The durable source of truth for the sidebar. Folders reference their
//! children by id; every mutation keeps `parent_folder_id`,
//! `sub_folder_ids` and `request_ids` consistent with each other.

use std::collections::HashSet;

use crate::error::{DomainError, DomainResult};
use crate::id::generate_id;
use crate::persistence::{Id, SavedFolder, SavedRequest, SavedRequestsSnapshot};

/// Ids removed by a cascading delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedItems {
    /// Removed folder ids, the deleted folder first.
    pub folders: Vec<Id>,
    /// Removed request ids.
    pub requests: Vec<Id>,
}

/// Owns the saved folder and request lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedRequestsStore {
    folders: Vec<SavedFolder>,
    requests: Vec<SavedRequest>,
}

impl SavedRequestsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a (migrated) snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: SavedRequestsSnapshot) -> Self {
        Self {
            folders: snapshot.saved_folders,
            requests: snapshot.saved_requests,
        }
    }

    /// Returns a persistable copy of the store.
    #[must_use]
    pub fn snapshot(&self) -> SavedRequestsSnapshot {
        SavedRequestsSnapshot {
            saved_requests: self.requests.clone(),
            saved_folders: self.folders.clone(),
        }
    }

    /// All folders in creation order.
    #[must_use]
    pub fn folders(&self) -> &[SavedFolder] {
        &self.folders
    }

    /// All requests in creation order.
    #[must_use]
    pub fn requests(&self) -> &[SavedRequest] {
        &self.requests
    }

    /// Looks a folder up by id.
    #[must_use]
    pub fn folder(&self, id: &str) -> Option<&SavedFolder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Looks a request up by id.
    #[must_use]
    pub fn request(&self, id: &str) -> Option<&SavedRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    fn folder_mut(&mut self, id: &str) -> Option<&mut SavedFolder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    /// Returns the folder that directly contains the request.
    #[must_use]
    pub fn folder_of_request(&self, request_id: &str) -> Option<&SavedFolder> {
        self.folders.iter().find(|f| f.contains_request(request_id))
    }

    /// Requests not contained in any folder.
    pub fn root_requests(&self) -> impl Iterator<Item = &SavedRequest> {
        self.requests
            .iter()
            .filter(|r| self.folder_of_request(&r.id).is_none())
    }

    /// Folders without a parent.
    pub fn root_folders(&self) -> impl Iterator<Item = &SavedFolder> {
        self.folders.iter().filter(|f| f.is_root())
    }

    /// Returns the folder chain from `folder_id` up to its root, leaf first.
    ///
    /// Unknown ids yield an empty chain. A corrupted parent cycle is cut
    /// at the first repeated folder.
    #[must_use]
    pub fn folder_chain(&self, folder_id: &str) -> Vec<Id> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.folder(folder_id);
        while let Some(folder) = current {
            if !seen.insert(folder.id.as_str()) {
                break;
            }
            chain.push(folder.id.clone());
            current = folder.parent_folder_id.as_deref().and_then(|p| self.folder(p));
        }
        chain
    }

    /// Returns the folder chain containing a request, leaf first.
    #[must_use]
    pub fn request_folder_chain(&self, request_id: &str) -> Vec<Id> {
        self.folder_of_request(request_id)
            .map(|f| self.folder_chain(&f.id))
            .unwrap_or_default()
    }

    /// Returns true if `folder_id` is `ancestor_id` or lies below it.
    #[must_use]
    pub fn is_folder_within(&self, folder_id: &str, ancestor_id: &str) -> bool {
        self.folder_chain(folder_id).iter().any(|id| id == ancestor_id)
    }

    /// Creates a folder and returns its id.
    ///
    /// An unknown `parent_id` places the folder at the root.
    pub fn add_folder(&mut self, name: impl Into<String>, parent_id: Option<&str>) -> Id {
        let id = generate_id();
        let parent = parent_id.filter(|p| self.folder(p).is_some()).map(str::to_string);
        if let Some(parent) = parent.as_deref().and_then(|p| self.folder_mut(p)) {
            parent.sub_folder_ids.push(id.clone());
        }
        self.folders.push(SavedFolder::new(id.clone(), name, parent));
        id
    }

    /// Renames a folder. Returns false if it does not exist.
    pub fn update_folder(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.folder_mut(id).map(|f| f.name = name.into()).is_some()
    }

    /// Deletes a folder with all nested folders and their requests.
    ///
    /// Returns `None` if the folder does not exist.
    pub fn delete_folder(&mut self, id: &str) -> Option<DeletedItems> {
        let parent = self.folder(id)?.parent_folder_id.clone();

        let mut deleted = DeletedItems::default();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(folder) = self.folder(&current) {
                stack.extend(folder.sub_folder_ids.iter().cloned());
                deleted.requests.extend(folder.request_ids.iter().cloned());
                deleted.folders.push(current);
            }
        }

        let folder_set: HashSet<&str> = deleted.folders.iter().map(String::as_str).collect();
        let request_set: HashSet<&str> = deleted.requests.iter().map(String::as_str).collect();
        self.folders.retain(|f| !folder_set.contains(f.id.as_str()));
        self.requests.retain(|r| !request_set.contains(r.id.as_str()));

        if let Some(parent) = parent.as_deref().and_then(|p| self.folder_mut(p)) {
            parent.sub_folder_ids.retain(|f| f != id);
        }
        Some(deleted)
    }

    /// Adds a request, optionally inside a folder, and returns its id.
    ///
    /// An empty or already used request id is replaced by a generated
    /// one. An unknown folder places the request at the root.
    pub fn add_request(&mut self, mut request: SavedRequest, folder_id: Option<&str>) -> Id {
        if request.id.is_empty() || self.request(&request.id).is_some() {
            request.id = generate_id();
        }
        let id = request.id.clone();
        if let Some(folder) = folder_id.and_then(|f| self.folder_mut(f)) {
            folder.request_ids.push(id.clone());
        }
        self.requests.push(request);
        id
    }

    /// Replaces a request with the same id. Returns false if it does not exist.
    pub fn update_request(&mut self, request: SavedRequest) -> bool {
        self.requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .map(|slot| *slot = request)
            .is_some()
    }

    /// Renames a request. Returns false if it does not exist.
    pub fn rename_request(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.requests
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| r.name = name.into())
            .is_some()
    }

    /// Deletes a request and its folder membership.
    pub fn delete_request(&mut self, id: &str) -> bool {
        let before = self.requests.len();
        self.requests.retain(|r| r.id != id);
        if self.requests.len() == before {
            return false;
        }
        for folder in &mut self.folders {
            folder.request_ids.retain(|r| r != id);
        }
        true
    }

    /// Moves a request into a folder, or to the root with `None`.
    ///
    /// Returns false if the request or the target folder does not exist.
    pub fn move_request_to_folder(&mut self, request_id: &str, folder_id: Option<&str>) -> bool {
        if self.request(request_id).is_none() {
            return false;
        }
        if folder_id.is_some_and(|f| self.folder(f).is_none()) {
            return false;
        }
        for folder in &mut self.folders {
            folder.request_ids.retain(|r| r != request_id);
        }
        if let Some(folder) = folder_id.and_then(|f| self.folder_mut(f)) {
            folder.request_ids.push(request_id.to_string());
        }
        true
    }

    /// Moves a folder under another folder, or to the root with `None`.
    ///
    /// Returns `Ok(false)` if either folder does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FolderCycle`] if the target is the folder
    /// itself or one of its descendants. The store is unchanged.
    pub fn move_folder_to_folder(&mut self, folder_id: &str, target_id: Option<&str>) -> DomainResult<bool> {
        let Some(folder) = self.folder(folder_id) else {
            return Ok(false);
        };
        let old_parent = folder.parent_folder_id.clone();
        if let Some(target) = target_id {
            if self.folder(target).is_none() {
                return Ok(false);
            }
            if self.is_folder_within(target, folder_id) {
                return Err(DomainError::FolderCycle {
                    folder: folder_id.to_string(),
                    target: target.to_string(),
                });
            }
        }

        if let Some(parent) = old_parent.as_deref().and_then(|p| self.folder_mut(p)) {
            parent.sub_folder_ids.retain(|f| f != folder_id);
        }
        if let Some(target) = target_id.and_then(|t| self.folder_mut(t)) {
            target.sub_folder_ids.push(folder_id.to_string());
        }
        if let Some(folder) = self.folder_mut(folder_id) {
            folder.parent_folder_id = target_id.map(str::to_string);
        }
        Ok(true)
    }
}
