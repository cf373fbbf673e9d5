//! Load-time migration of legacy saved request blobs.
//!
//! Older builds stored request bodies as a JSON-encoded string, had no
//! `params`, and did not track `subFolderIds`. Everything here is
//! tolerant: a malformed fragment is defaulted, never rejected.

use std::collections::HashSet;
use std::fmt;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use super::common::{HttpMethod, Id, KeyValuePair};
use super::folder::SavedFolder;
use super::request::SavedRequest;
use super::snapshot::SavedRequestsSnapshot;
use crate::id::generate_id;

/// Counters describing what a migration pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// String bodies decoded into rows.
    pub bodies_decoded: usize,
    /// Bodies that could not be decoded and were reset to empty.
    pub bodies_dropped: usize,
    /// Requests that had no `params` field.
    pub params_defaulted: usize,
    /// Folders whose `subFolderIds` were rebuilt from child parent links.
    pub sub_folders_rebuilt: usize,
    /// Folders whose parent no longer exists, moved to the root.
    pub orphans_reparented: usize,
    /// `requestIds` entries pointing at nothing, removed.
    pub dangling_request_ids: usize,
    /// Records that were not JSON objects, skipped.
    pub records_skipped: usize,
    /// Requests or folders given a fresh id because theirs was missing or taken.
    pub ids_generated: usize,
    /// Unknown method names replaced with `GET`.
    pub methods_defaulted: usize,
    /// Header, param or body rows that did not parse, removed.
    pub rows_dropped: usize,
}

impl MigrationReport {
    /// Returns true if the blob was already in the current shape.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.bodies_decoded == 0
            && self.bodies_dropped == 0
            && self.params_defaulted == 0
            && self.sub_folders_rebuilt == 0
            && self.orphans_reparented == 0
            && self.dangling_request_ids == 0
            && self.records_skipped == 0
            && self.ids_generated == 0
            && self.methods_defaulted == 0
            && self.rows_dropped == 0
    }
}

/// Deserializes `T`, falling back to its default when the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default, deserialize_with = "lenient")]
    saved_requests: Vec<JsonValue>,
    #[serde(default, deserialize_with = "lenient")]
    saved_folders: Vec<JsonValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    method: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    url: String,
    #[serde(default, deserialize_with = "lenient")]
    headers: Vec<JsonValue>,
    #[serde(default)]
    body: Option<RawBody>,
    #[serde(default, deserialize_with = "lenient")]
    params: Option<Vec<JsonValue>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBody {
    Encoded(String),
    Rows(Vec<JsonValue>),
    Other(JsonValue),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFolder {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    parent_folder_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    request_ids: Vec<JsonValue>,
    #[serde(default, deserialize_with = "lenient")]
    sub_folder_ids: Option<Vec<JsonValue>>,
}

/// Parses and normalizes a persisted `reqx_saved_requests` blob.
///
/// # Errors
///
/// Returns an error only if `json` is not a JSON object. Records that
/// are not objects are skipped, and malformed fields inside a record
/// are defaulted.
pub fn migrate_saved_requests(
    json: &str,
) -> Result<(SavedRequestsSnapshot, MigrationReport), serde_json::Error> {
    let value: JsonValue = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom("saved requests must be a JSON object"));
    }
    let raw: RawSnapshot = serde_json::from_value(value)?;
    Ok(migrate_raw(raw))
}

fn parse_records<T: DeserializeOwned>(
    values: Vec<JsonValue>,
    report: &mut MigrationReport,
) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| {
            let parsed = serde_json::from_value(value).ok();
            if parsed.is_none() {
                report.records_skipped += 1;
            }
            parsed
        })
        .collect()
}

/// Returns `id` if it is present and unused, otherwise a fresh one.
fn claim_id(id: Option<Id>, taken: &mut HashSet<Id>, report: &mut MigrationReport) -> Id {
    let id = match id {
        Some(id) if !id.is_empty() && !taken.contains(&id) => id,
        _ => {
            report.ids_generated += 1;
            generate_id()
        }
    };
    taken.insert(id.clone());
    id
}

fn id_list(values: Vec<JsonValue>) -> Vec<Id> {
    values
        .into_iter()
        .filter_map(|value| match value {
            JsonValue::String(id) => Some(id),
            _ => None,
        })
        .collect()
}

fn migrate_raw(raw: RawSnapshot) -> (SavedRequestsSnapshot, MigrationReport) {
    let mut report = MigrationReport::default();

    let raw_requests: Vec<RawRequest> = parse_records(raw.saved_requests, &mut report);
    let raw_folders: Vec<RawFolder> = parse_records(raw.saved_folders, &mut report);

    let mut request_ids = HashSet::new();
    let saved_requests: Vec<SavedRequest> = raw_requests
        .into_iter()
        .map(|r| migrate_request(r, &mut request_ids, &mut report))
        .collect();

    let mut folder_ids = HashSet::new();
    let folders: Vec<(Id, RawFolder)> = raw_folders
        .into_iter()
        .map(|mut folder| (claim_id(folder.id.take(), &mut folder_ids, &mut report), folder))
        .collect();

    let mut saved_folders: Vec<SavedFolder> = Vec::with_capacity(folders.len());
    let mut needs_rebuild = Vec::new();
    for (id, folder) in folders {
        let mut parent_folder_id = folder.parent_folder_id;
        if parent_folder_id
            .as_ref()
            .is_some_and(|p| !folder_ids.contains(p) || p == &id)
        {
            parent_folder_id = None;
            report.orphans_reparented += 1;
        }

        let before = folder.request_ids.len();
        let kept: Vec<Id> = id_list(folder.request_ids)
            .into_iter()
            .filter(|id| request_ids.contains(id))
            .collect();
        report.dangling_request_ids += before - kept.len();

        if folder.sub_folder_ids.is_none() {
            needs_rebuild.push(saved_folders.len());
        }
        saved_folders.push(SavedFolder {
            id,
            name: folder.name,
            parent_folder_id,
            request_ids: kept,
            sub_folder_ids: folder.sub_folder_ids.map(id_list).unwrap_or_default(),
        });
    }

    for index in needs_rebuild {
        let id = saved_folders[index].id.clone();
        let children: Vec<Id> = saved_folders
            .iter()
            .filter(|f| f.parent_folder_id.as_deref() == Some(id.as_str()))
            .map(|f| f.id.clone())
            .collect();
        saved_folders[index].sub_folder_ids = children;
        report.sub_folders_rebuilt += 1;
    }

    (
        SavedRequestsSnapshot {
            saved_requests,
            saved_folders,
        },
        report,
    )
}

fn parse_rows(values: Vec<JsonValue>, report: &mut MigrationReport) -> Vec<KeyValuePair> {
    values
        .into_iter()
        .filter_map(|value| {
            let row = serde_json::from_value(value).ok();
            if row.is_none() {
                report.rows_dropped += 1;
            }
            row
        })
        .collect()
}

fn migrate_request(
    raw: RawRequest,
    taken: &mut HashSet<Id>,
    report: &mut MigrationReport,
) -> SavedRequest {
    let id = claim_id(raw.id, taken, report);

    let method = match raw.method {
        None => HttpMethod::default(),
        Some(name) => name.parse().unwrap_or_else(|_| {
            report.methods_defaulted += 1;
            HttpMethod::default()
        }),
    };

    let body = match raw.body {
        None => Vec::new(),
        Some(RawBody::Rows(rows)) => parse_rows(rows, report),
        Some(RawBody::Encoded(text)) => {
            if let Some(rows) = decode_legacy_body(&text) {
                report.bodies_decoded += 1;
                rows
            } else {
                report.bodies_dropped += 1;
                Vec::new()
            }
        }
        Some(RawBody::Other(value)) => {
            if !value.is_null() {
                report.bodies_dropped += 1;
            }
            Vec::new()
        }
    };

    let params = match raw.params {
        Some(rows) => parse_rows(rows, report),
        None => {
            report.params_defaulted += 1;
            Vec::new()
        }
    };

    SavedRequest {
        id,
        name: raw.name,
        method,
        url: raw.url,
        headers: parse_rows(raw.headers, report),
        body,
        params,
    }
}

/// A JSON object whose entries keep their document order.
struct OrderedObject(Vec<(String, JsonValue)>);

impl<'de> Deserialize<'de> for OrderedObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedObject;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(OrderedObject(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Decodes a legacy string body into key/value rows.
///
/// Accepts a JSON object (`{"a":1}` becomes one row `a` = `1`, rows in
/// key order as written) or a JSON array of rows. An empty string decodes
/// to no rows. Returns `None` for anything else.
#[must_use]
pub fn decode_legacy_body(text: &str) -> Option<Vec<KeyValuePair>> {
    if text.trim().is_empty() {
        return Some(Vec::new());
    }

    if let Ok(OrderedObject(entries)) = serde_json::from_str::<OrderedObject>(text) {
        return Some(
            entries
                .into_iter()
                .map(|(key, value)| KeyValuePair::new(key, scalar_to_string(value)))
                .collect(),
        );
    }

    match serde_json::from_str::<JsonValue>(text).ok()? {
        value @ JsonValue::Array(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

fn scalar_to_string(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_string_body_is_decoded() {
        let blob = r#"{
            "savedRequests": [
                {"id": "r1", "name": "Legacy", "method": "POST", "url": "/x", "headers": [], "body": "{\"a\":1}"}
            ],
            "savedFolders": []
        }"#;

        let (snapshot, report) = migrate_saved_requests(blob).unwrap();
        let request = &snapshot.saved_requests[0];

        assert_eq!(request.body.len(), 1);
        assert_eq!(request.body[0].key_name, "a");
        assert_eq!(request.body[0].value, "1");
        assert!(request.body[0].enabled);
        assert_eq!(request.body[0].id.len(), 36);
        assert_eq!(report.bodies_decoded, 1);
    }

    #[test]
    fn test_unparseable_body_falls_back_to_empty() {
        let blob = r#"{"savedRequests": [{"id": "r1", "name": "x", "body": "not json"}]}"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        assert!(snapshot.saved_requests[0].body.is_empty());
        assert_eq!(report.bodies_dropped, 1);
    }

    #[test]
    fn test_missing_params_defaulted() {
        let blob = r#"{"savedRequests": [{"id": "r1", "name": "x", "body": []}]}"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        assert!(snapshot.saved_requests[0].params.is_empty());
        assert_eq!(report.params_defaulted, 1);
        assert_eq!(snapshot.saved_requests[0].method, HttpMethod::Get);
    }

    #[test]
    fn test_current_shape_is_clean() {
        let blob = r#"{
            "savedRequests": [
                {"id": "r1", "name": "x", "method": "GET", "url": "", "headers": [],
                 "body": [{"id": "b1", "keyName": "k", "value": "v", "enabled": false}], "params": []}
            ],
            "savedFolders": [
                {"id": "f1", "name": "F", "parentFolderId": null, "requestIds": ["r1"], "subFolderIds": []}
            ]
        }"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        assert!(report.is_clean());
        assert_eq!(snapshot.saved_requests[0].body[0].id, "b1");
        assert!(!snapshot.saved_requests[0].body[0].enabled);
    }

    #[test]
    fn test_sub_folder_ids_rebuilt_from_parents() {
        let blob = r#"{
            "savedFolders": [
                {"id": "root", "name": "Root"},
                {"id": "a", "name": "A", "parentFolderId": "root"},
                {"id": "b", "name": "B", "parentFolderId": "root", "subFolderIds": []}
            ]
        }"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        assert_eq!(snapshot.saved_folders[0].sub_folder_ids, vec!["a", "b"]);
        assert_eq!(snapshot.saved_folders[0].parent_folder_id, None);
        assert_eq!(report.sub_folders_rebuilt, 2);
    }

    #[test]
    fn test_dangling_references_repaired() {
        let blob = r#"{
            "savedRequests": [{"id": "r1", "name": "x", "params": []}],
            "savedFolders": [
                {"id": "a", "name": "A", "parentFolderId": "gone", "requestIds": ["r1", "r2"], "subFolderIds": []}
            ]
        }"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        assert_eq!(snapshot.saved_folders[0].parent_folder_id, None);
        assert_eq!(snapshot.saved_folders[0].request_ids, vec!["r1"]);
        assert_eq!(report.orphans_reparented, 1);
        assert_eq!(report.dangling_request_ids, 1);
    }

    #[test]
    fn test_empty_blob() {
        let (snapshot, report) = migrate_saved_requests("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_decode_legacy_body_variants() {
        assert_eq!(decode_legacy_body("  "), Some(Vec::new()));
        assert_eq!(decode_legacy_body("42"), None);

        let rows = decode_legacy_body(r#"{"s":"text","n":null,"b":true}"#).unwrap();
        let mut values: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.key_name.as_str(), r.value.as_str()))
            .collect();
        values.sort_unstable();
        assert_eq!(values, vec![("b", "true"), ("n", ""), ("s", "text")]);

        let rows = decode_legacy_body(r#"[{"keyName":"k","value":"v"}]"#).unwrap();
        assert_eq!(rows[0].key_name, "k");
    }

    #[test]
    fn test_one_bad_record_keeps_the_rest() {
        let blob = r#"{
            "savedRequests": [
                {"id": "r1", "name": "keep me", "method": "GET"},
                {"id": "r2", "method": "get"},
                42
            ],
            "savedFolders": ["junk", {"id": "f1", "name": "F", "requestIds": ["r1", 7]}]
        }"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        let ids: Vec<&str> = snapshot.saved_requests.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert_eq!(snapshot.saved_requests[0].name, "keep me");
        assert_eq!(snapshot.saved_folders.len(), 1);
        assert_eq!(snapshot.saved_folders[0].request_ids, vec!["r1"]);
        assert_eq!(report.records_skipped, 2);
    }

    #[test]
    fn test_method_is_parsed_leniently() {
        let blob = r#"{"savedRequests": [
            {"id": "a", "method": "post", "params": []},
            {"id": "b", "method": "TRACE", "params": []},
            {"id": "c", "method": 5, "params": []}
        ]}"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        let methods: Vec<HttpMethod> = snapshot.saved_requests.iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Get, HttpMethod::Get]);
        assert_eq!(report.methods_defaulted, 1);
    }

    #[test]
    fn test_missing_and_duplicate_ids_are_generated() {
        let blob = r#"{
            "savedRequests": [
                {"name": "no id", "params": []},
                {"id": "r1", "name": "first", "params": []},
                {"id": "r1", "name": "second", "params": []}
            ],
            "savedFolders": [{"name": "no id folder", "subFolderIds": []}]
        }"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();

        let requests = &snapshot.saved_requests;
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].id.len(), 36);
        assert_eq!(requests[1].id, "r1");
        assert_ne!(requests[2].id, "r1");
        assert_eq!(requests[2].name, "second");
        assert_eq!(snapshot.saved_folders[0].id.len(), 36);
        assert_eq!(report.ids_generated, 3);
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let blob = r#"{"savedRequests": [{
            "id": "r1",
            "headers": [{"keyName": "Accept", "value": "json"}, {"keyName": "X-Num", "value": 3}],
            "params": [{"keyName": "page", "value": "1"}, "bad"],
            "body": [{"keyName": "a", "value": "1"}, {"keyName": ["x"]}]
        }]}"#;
        let (snapshot, report) = migrate_saved_requests(blob).unwrap();
        let request = &snapshot.saved_requests[0];

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers[0].key_name, "Accept");
        assert_eq!(request.params.len(), 1);
        assert_eq!(request.body.len(), 1);
        assert_eq!(report.rows_dropped, 3);
    }

    #[test]
    fn test_legacy_body_keeps_key_order() {
        let rows = decode_legacy_body(r#"{"zeta":"1","alpha":"2","mid":"3"}"#).unwrap();
        let keys: Vec<&str> = rows.iter().map(|r| r.key_name.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_outer_shape_error() {
        assert!(migrate_saved_requests("[1,2]").is_err());
        assert!(migrate_saved_requests("not json").is_err());
    }
}
