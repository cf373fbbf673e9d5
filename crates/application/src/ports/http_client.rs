//! HTTP client port

use std::future::Future;

use reqx_domain::HttpMethod;

use crate::ApplicationResult;

/// A fully resolved request handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Final URL including the encoded query string.
    pub url: String,
    /// Enabled headers as name/value pairs.
    pub headers: Vec<(String, String)>,
    /// JSON body built from the enabled body rows, if any.
    pub body: Option<serde_json::Value>,
}

/// What the transport got back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: String,
    /// Round-trip time in milliseconds.
    pub duration_ms: u64,
}

impl ApiResponse {
    /// Returns true for a status in `[200, 300)`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Port for sending HTTP requests.
///
/// The core never performs network I/O itself; it resolves the request
/// and hands it to an implementation of this trait.
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received (network failure,
    /// timeout, cancelled).
    fn send(&self, request: &ApiRequest) -> impl Future<Output = ApplicationResult<ApiResponse>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> ApiResponse {
        ApiResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
            duration_ms: 0,
        }
    }

    #[test]
    fn test_success_range() {
        assert!(!response(199).is_success());
        assert!(response(200).is_success());
        assert!(response(299).is_success());
        assert!(!response(300).is_success());
        assert!(!response(404).is_success());
    }
}
