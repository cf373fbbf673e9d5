//! Common types shared across persistence models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::generate_id;

/// A UUID string type for stable identifiers.
pub type Id = String;

/// Storage key of the saved requests/folders blob.
pub const SAVED_REQUESTS_KEY: &str = "reqx_saved_requests";

/// Storage key of the four-bucket variable scope.
pub const VARIABLES_KEY: &str = "reqx_variables";

/// HTTP methods supported by saved requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
}

impl HttpMethod {
    /// Returns the method as an uppercase string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    /// Parses a method name case-insensitively.
    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(DomainError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A key/value row of a request body or query parameter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValuePair {
    /// Row id. Legacy rows without one get a fresh id on load.
    #[serde(default = "generate_id")]
    pub id: Id,
    /// The key. May contain `${variables}`.
    #[serde(default)]
    pub key_name: String,
    /// The value. May contain `${variables}`.
    #[serde(default)]
    pub value: String,
    /// Disabled rows are kept but not sent.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl KeyValuePair {
    /// Creates an enabled row with a generated id.
    #[must_use]
    pub fn new(key_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            key_name: key_name.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled row with a generated id.
    #[must_use]
    pub fn disabled(key_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key_name, value)
        }
    }
}

/// A request header row. Same shape as a body/param row.
pub type RequestHeader = KeyValuePair;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn test_http_method_serde() {
        let method: HttpMethod = serde_json::from_str("\"PATCH\"").unwrap();
        assert_eq!(method, HttpMethod::Patch);
        assert_eq!(serde_json::to_string(&HttpMethod::Delete).unwrap(), "\"DELETE\"");
    }

    #[test]
    fn test_http_method_from_str() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!(" Patch ".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert_eq!(
            "trace".parse::<HttpMethod>(),
            Err(DomainError::UnsupportedMethod("TRACE".to_string()))
        );
    }

    #[test]
    fn test_key_value_pair_defaults() {
        let pair: KeyValuePair = serde_json::from_str(r#"{"keyName":"a","value":"1"}"#).unwrap();
        assert_eq!(pair.key_name, "a");
        assert!(pair.enabled);
        assert_eq!(pair.id.len(), 36);
    }
}
