//! Saved request type.

use serde::{Deserialize, Serialize};

use super::common::{HttpMethod, Id, KeyValuePair, RequestHeader};

/// A saved HTTP request.
///
/// Membership in a folder is tracked by the folder's `request_ids`,
/// not by a field on the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequest {
    /// Unique identifier.
    pub id: Id,

    /// Human-readable request name.
    pub name: String,

    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,

    /// Request URL. May contain `${variables}`.
    #[serde(default)]
    pub url: String,

    /// Header rows.
    #[serde(default)]
    pub headers: Vec<RequestHeader>,

    /// Body rows.
    #[serde(default)]
    pub body: Vec<KeyValuePair>,

    /// Query parameter rows.
    #[serde(default)]
    pub params: Vec<KeyValuePair>,
}

impl SavedRequest {
    /// Creates a new request with required fields.
    #[must_use]
    pub fn new(id: Id, name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Adds a header row.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(RequestHeader::new(key, value));
        self
    }

    /// Adds a body row.
    #[must_use]
    pub fn with_body_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.push(KeyValuePair::new(key, value));
        self
    }

    /// Adds a query parameter row.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(KeyValuePair::new(key, value));
        self
    }
}
