//! Saved folder type.

use serde::{Deserialize, Serialize};

use super::common::Id;

/// A folder of saved requests.
///
/// `sub_folder_ids` mirrors the set of folders whose `parent_folder_id`
/// points here; the store keeps both sides in step on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFolder {
    /// Unique identifier.
    pub id: Id,

    /// Human-readable folder name.
    pub name: String,

    /// Parent folder, `None` for root folders.
    #[serde(default)]
    pub parent_folder_id: Option<Id>,

    /// Requests contained directly in this folder.
    #[serde(default)]
    pub request_ids: Vec<Id>,

    /// Direct child folders.
    #[serde(default)]
    pub sub_folder_ids: Vec<Id>,
}

impl SavedFolder {
    /// Creates an empty folder.
    #[must_use]
    pub fn new(id: Id, name: impl Into<String>, parent_folder_id: Option<Id>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_folder_id,
            request_ids: Vec::new(),
            sub_folder_ids: Vec::new(),
        }
    }

    /// Returns true if the folder is at the root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Returns true if the folder directly contains the request.
    #[must_use]
    pub fn contains_request(&self, request_id: &str) -> bool {
        self.request_ids.iter().any(|id| id == request_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_new() {
        let folder = SavedFolder::new("f1".to_string(), "Auth", None);
        assert_eq!(folder.name, "Auth");
        assert!(folder.is_root());
        assert!(folder.request_ids.is_empty());
    }

    #[test]
    fn test_folder_wire_names() {
        let mut folder = SavedFolder::new("f1".to_string(), "Users", Some("root".to_string()));
        folder.request_ids.push("r1".to_string());

        let json = serde_json::to_value(&folder).unwrap();
        assert_eq!(json["parentFolderId"], "root");
        assert_eq!(json["requestIds"][0], "r1");
        assert_eq!(json["subFolderIds"], serde_json::json!([]));
        assert!(folder.contains_request("r1"));
    }
}
