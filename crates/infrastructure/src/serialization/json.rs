//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
/// - Keys sorted alphabetically when the source is a map or `Value`
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Re-formats a JSON document into the stable layout.
///
/// Going through `serde_json::Value` sorts object keys, so the same data
/// always produces the same bytes regardless of how it was written.
///
/// # Errors
///
/// Returns an error if `json` is not valid JSON.
pub fn normalize_json(json: &str) -> Result<String, SerializationError> {
    let value: serde_json::Value = from_json(json)?;
    to_json_stable(&value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_stable_serialization_format() {
        let mut map = BTreeMap::new();
        map.insert("z_key", "value1");
        map.insert("a_key", "value2");

        let json = to_json_stable(&map).unwrap();
        assert_eq!(json, "{\n  \"a_key\": \"value2\",\n  \"z_key\": \"value1\"\n}\n");
    }

    #[test]
    fn test_normalize_sorts_keys() {
        let json = normalize_json(r#"{"savedRequests":[],"savedFolders":[{"name":"a","id":"1"}]}"#).unwrap();
        assert_eq!(
            json,
            "{\n  \"savedFolders\": [\n    {\n      \"id\": \"1\",\n      \"name\": \"a\"\n    }\n  ],\n  \"savedRequests\": []\n}\n"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_json(r#"{"b":1,"a":[true,null]}"#).unwrap();
        assert_eq!(normalize_json(&once).unwrap(), once);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            normalize_json("{not json"),
            Err(SerializationError::Deserialize(_))
        ));
    }
}
