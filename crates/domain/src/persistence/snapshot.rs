//! The persisted saved requests blob.

use serde::{Deserialize, Serialize};

use super::folder::SavedFolder;
use super::request::SavedRequest;

/// Everything stored under `reqx_saved_requests`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequestsSnapshot {
    /// All saved requests, in creation order.
    #[serde(default)]
    pub saved_requests: Vec<SavedRequest>,
    /// All saved folders, in creation order.
    #[serde(default)]
    pub saved_folders: Vec<SavedFolder>,
}

impl SavedRequestsSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there is nothing saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.saved_requests.is_empty() && self.saved_folders.is_empty()
    }
}
