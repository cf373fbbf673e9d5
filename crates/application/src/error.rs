//! Application error types

use reqx_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
///
/// Only the I/O boundary produces these; tree and store mutations
/// degrade to no-ops instead.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The HTTP collaborator failed to deliver a response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A persisted value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
