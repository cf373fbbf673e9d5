//! Send request use case.
//!
//! Resolves a saved request's fields against the variable scope and hands
//! the result to the HTTP port. Transport lives behind [`HttpClient`].

use chrono::{DateTime, Utc};
use reqx_domain::{KeyValuePair, SavedRequest, SavedRequestsStore, VariableScope};

use crate::ApplicationResult;
use crate::ports::{ApiRequest, ApiResponse, Clock, HttpClient};
use crate::variable_resolver::{ResolutionContext, VariableResolver};

/// A request after variable resolution, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// What the transport receives.
    pub request: ApiRequest,
    /// Names referenced but not defined in any applicable scope,
    /// deduplicated, in first-occurrence order.
    pub undefined_variables: Vec<String>,
}

/// The result of a completed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// The request as sent.
    pub request: ApiRequest,
    /// The response received.
    pub response: ApiResponse,
    /// Names that were sent unresolved.
    pub undefined_variables: Vec<String>,
    /// When the send started.
    pub sent_at: DateTime<Utc>,
    /// True for a status in `[200, 300)`.
    pub success: bool,
}

struct Collector<'a> {
    resolver: VariableResolver<'a>,
    undefined: Vec<String>,
}

impl Collector<'_> {
    fn resolve(&mut self, text: &str) -> String {
        let result = self.resolver.resolve(text);
        for name in result.unresolved {
            if !self.undefined.contains(&name) {
                self.undefined.push(name);
            }
        }
        result.resolved
    }

    fn resolve_pairs(&mut self, pairs: &[KeyValuePair]) -> Vec<(String, String)> {
        pairs
            .iter()
            .filter(|p| p.enabled && !p.key_name.trim().is_empty())
            .map(|p| (self.resolve(&p.key_name), self.resolve(&p.value)))
            .collect()
    }
}

/// Resolves every field of `request` and builds the transport request.
///
/// The context is the request itself, its folder chain in `store`, and
/// `collection_id` when given. Enabled params are URL-encoded and
/// appended to the URL; enabled body rows become a JSON object of
/// strings. Disabled or keyless rows are skipped.
#[must_use]
pub fn prepare_request(
    request: &SavedRequest,
    store: &SavedRequestsStore,
    scope: &VariableScope,
    collection_id: Option<&str>,
) -> PreparedRequest {
    let mut context = ResolutionContext::new()
        .with_folder_hierarchy(store.request_folder_chain(&request.id))
        .with_request(request.id.clone());
    if let Some(collection_id) = collection_id {
        context = context.with_collection(collection_id);
    }

    let mut collector = Collector {
        resolver: VariableResolver::new(scope, &context),
        undefined: Vec::new(),
    };

    let mut url = collector.resolve(&request.url);
    let params = collector.resolve_pairs(&request.params);
    if !params.is_empty() {
        // Encoding a list of string pairs cannot fail.
        let query = serde_urlencoded::to_string(&params).unwrap_or_default();
        url = append_query(&url, &query);
    }

    let headers = collector.resolve_pairs(&request.headers);
    let body_rows = collector.resolve_pairs(&request.body);
    let body = (!body_rows.is_empty()).then(|| {
        serde_json::Value::Object(
            body_rows
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect(),
        )
    });

    PreparedRequest {
        request: ApiRequest {
            method: request.method,
            url,
            headers,
            body,
        },
        undefined_variables: collector.undefined,
    }
}

/// Appends `query` to the query part of `url`, before any `#fragment`.
fn append_query(url: &str, query: &str) -> String {
    let (base, fragment) = url.split_once('#').map_or((url, None), |(b, f)| (b, Some(f)));
    let mut out = String::with_capacity(url.len() + query.len() + 1);
    out.push_str(base);
    match base.find('?') {
        None => out.push('?'),
        Some(at) if at + 1 == base.len() || base.ends_with('&') => {}
        Some(_) => out.push('&'),
    }
    out.push_str(query);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Use case for sending a saved request.
pub struct SendRequest<H: HttpClient, C: Clock> {
    client: H,
    clock: C,
}

impl<H: HttpClient, C: Clock> SendRequest<H, C> {
    /// Creates a new `SendRequest` use case.
    #[must_use]
    pub const fn new(client: H, clock: C) -> Self {
        Self { client, clock }
    }

    /// Resolves and sends the request.
    ///
    /// Undefined variables do not stop the send; they are reported in
    /// the outcome and the placeholders go out as written.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport produced no response.
    pub async fn execute(
        &self,
        request: &SavedRequest,
        store: &SavedRequestsStore,
        scope: &VariableScope,
        collection_id: Option<&str>,
    ) -> ApplicationResult<SendOutcome> {
        let prepared = prepare_request(request, store, scope, collection_id);
        if !prepared.undefined_variables.is_empty() {
            tracing::warn!(
                request_id = %request.id,
                undefined = ?prepared.undefined_variables,
                "Sending with undefined variables"
            );
        }

        let sent_at = self.clock.now();
        tracing::debug!(method = %prepared.request.method, url = %prepared.request.url, "Sending request");
        let response = self.client.send(&prepared.request).await?;
        let success = response.is_success();
        tracing::info!(
            request_id = %request.id,
            status = response.status,
            duration_ms = response.duration_ms,
            success,
            "Request completed"
        );

        Ok(SendOutcome {
            request: prepared.request,
            response,
            undefined_variables: prepared.undefined_variables,
            sent_at,
            success,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ApplicationError;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use reqx_domain::{HttpMethod, ScopeTarget, Variable};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    struct FakeClient {
        status: Option<u16>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl FakeClient {
        fn replying(status: u16) -> Self {
            Self {
                status: Some(status),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                status: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for FakeClient {
        async fn send(&self, request: &ApiRequest) -> ApplicationResult<ApiResponse> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(request.clone());
            }
            let status = self
                .status
                .ok_or_else(|| ApplicationError::Http("connection refused".to_string()))?;
            Ok(ApiResponse {
                status,
                headers: Vec::new(),
                body: "{}".to_string(),
                duration_ms: 12,
            })
        }
    }

    fn fixture() -> (SavedRequestsStore, VariableScope, SavedRequest) {
        let mut store = SavedRequestsStore::new();
        let api = store.add_folder("api", None);
        let users = store.add_folder("users", Some(api.as_str()));
        let request = SavedRequest::new("r1".into(), "get user", HttpMethod::Get, "${base}/users/${id}")
            .with_header("Authorization", "Bearer ${token}")
            .with_param("expand", "${expand}")
            .with_param("q", "a b&c");
        store.add_request(request.clone(), Some(users.as_str()));

        let mut scope = VariableScope::new();
        scope
            .add_variable(&ScopeTarget::Global, Variable::new("base", "https://global"))
            .unwrap();
        scope
            .add_variable(&ScopeTarget::Folder(api), Variable::new("base", "https://api"))
            .unwrap();
        scope
            .add_variable(&ScopeTarget::Folder(users), Variable::new("expand", "roles"))
            .unwrap();
        scope
            .add_variable(&ScopeTarget::Request("r1".into()), Variable::new("id", "42"))
            .unwrap();
        (store, scope, request)
    }

    #[test]
    fn test_prepare_resolves_all_fields() {
        let (store, scope, request) = fixture();

        let prepared = prepare_request(&request, &store, &scope, None);

        assert_eq!(prepared.request.url, "https://api/users/42?expand=roles&q=a+b%26c");
        assert_eq!(
            prepared.request.headers,
            vec![("Authorization".to_string(), "Bearer ${token}".to_string())]
        );
        assert_eq!(prepared.request.body, None);
        assert_eq!(prepared.undefined_variables, vec!["token"]);
    }

    #[test]
    fn test_prepare_skips_disabled_rows_and_builds_body() {
        let store = SavedRequestsStore::new();
        let scope = VariableScope::new();
        let mut request = SavedRequest::new("r".into(), "post", HttpMethod::Post, "https://x/?a=1")
            .with_param("b", "2")
            .with_body_field("name", "reqx")
            .with_body_field("", "ignored");
        request.params.push(KeyValuePair::disabled("off", "1"));

        let prepared = prepare_request(&request, &store, &scope, None);

        assert_eq!(prepared.request.url, "https://x/?a=1&b=2");
        assert_eq!(prepared.request.body, Some(serde_json::json!({"name": "reqx"})));
    }

    #[test]
    fn test_prepare_puts_query_before_fragment() {
        let store = SavedRequestsStore::new();
        let scope = VariableScope::new();
        let request = SavedRequest::new("r".into(), "r", HttpMethod::Get, "https://x/a#top")
            .with_param("page", "1");

        let prepared = prepare_request(&request, &store, &scope, None);

        assert_eq!(prepared.request.url, "https://x/a?page=1#top");
    }

    #[test]
    fn test_append_query_separators() {
        assert_eq!(append_query("https://x/a", "b=2"), "https://x/a?b=2");
        assert_eq!(append_query("https://x/a?a=1#f", "b=2"), "https://x/a?a=1&b=2#f");
        assert_eq!(append_query("https://x/a?", "b=2"), "https://x/a?b=2");
        assert_eq!(append_query("https://x/a?a=1&", "b=2"), "https://x/a?a=1&b=2");
        assert_eq!(append_query("https://x/#p?q", "b=2"), "https://x/?b=2#p?q");
    }

    #[test]
    fn test_prepare_uses_collection_scope() {
        let store = SavedRequestsStore::new();
        let mut scope = VariableScope::new();
        scope
            .add_variable(&ScopeTarget::Collection("c1".into()), Variable::new("host", "col"))
            .unwrap();
        let request = SavedRequest::new("r".into(), "r", HttpMethod::Get, "${host}");

        assert_eq!(prepare_request(&request, &store, &scope, Some("c1")).request.url, "col");
        assert_eq!(prepare_request(&request, &store, &scope, None).request.url, "${host}");
    }

    #[tokio::test]
    async fn test_execute_classifies_success() {
        let (store, scope, request) = fixture();
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let use_case = SendRequest::new(FakeClient::replying(201), FixedClock(at));

        let outcome = use_case.execute(&request, &store, &scope, None).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sent_at, at);
        assert_eq!(outcome.undefined_variables, vec!["token"]);
        assert_eq!(use_case.client.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_execute_error_status_is_not_success() {
        let (store, scope, request) = fixture();
        let use_case = SendRequest::new(FakeClient::replying(500), FixedClock(Utc::now()));

        let outcome = use_case.execute(&request, &store, &scope, None).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.response.status, 500);
    }

    #[tokio::test]
    async fn test_execute_propagates_transport_failure() {
        let (store, scope, request) = fixture();
        let use_case = SendRequest::new(FakeClient::failing(), FixedClock(Utc::now()));

        let result = use_case.execute(&request, &store, &scope, None).await;
        assert!(matches!(result, Err(ApplicationError::Http(_))));
    }
}
