//! Resolution context

use reqx_domain::{Id, ScopeTarget};

/// Where a string is being resolved: which collection, folder chain and
/// request supply scoped variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Collection whose variables apply, if any.
    pub collection_id: Option<Id>,
    /// Folder ids ordered leaf to root, as produced by
    /// `SavedRequestsStore::folder_chain`.
    pub folder_hierarchy: Vec<Id>,
    /// Request whose variables apply, if any.
    pub request_id: Option<Id>,
}

impl ResolutionContext {
    /// Creates an empty context: only globals apply.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collection.
    #[must_use]
    pub fn with_collection(mut self, collection_id: impl Into<Id>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    /// Sets the folder chain, leaf first.
    #[must_use]
    pub fn with_folder_hierarchy(mut self, folder_hierarchy: Vec<Id>) -> Self {
        self.folder_hierarchy = folder_hierarchy;
        self
    }

    /// Sets the request.
    #[must_use]
    pub fn with_request(mut self, request_id: impl Into<Id>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns the scope buckets to consult, lowest priority first.
    ///
    /// Global, then the collection, then folders root to leaf, then the
    /// request. A later layer overrides an earlier one.
    #[must_use]
    pub fn layers(&self) -> Vec<ScopeTarget> {
        let mut layers = Vec::with_capacity(self.folder_hierarchy.len() + 3);
        layers.push(ScopeTarget::Global);
        if let Some(id) = &self.collection_id {
            layers.push(ScopeTarget::Collection(id.clone()));
        }
        layers.extend(
            self.folder_hierarchy
                .iter()
                .rev()
                .map(|id| ScopeTarget::Folder(id.clone())),
        );
        if let Some(id) = &self.request_id {
            layers.push(ScopeTarget::Request(id.clone()));
        }
        layers
    }
}
