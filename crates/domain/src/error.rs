//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation.
///
/// Structural no-ops (unknown ids, missing parents) are never reported
/// through this type; they are signalled by `bool`/`Option` returns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The variable name does not match `^[A-Za-z_][A-Za-z0-9_]*$`.
    #[error("invalid variable name: {0}")]
    InvalidVariableName(String),

    /// A variable with the same name already exists in the target bucket.
    #[error("duplicate variable name: {0}")]
    DuplicateVariable(String),

    /// The referenced variable does not exist in the target bucket.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// The referenced environment does not exist.
    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    /// The HTTP method name is not one of the supported methods.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Moving the folder would make it its own ancestor.
    #[error("folder {folder} cannot be moved into its descendant {target}")]
    FolderCycle {
        /// The folder being moved.
        folder: String,
        /// The requested new parent.
        target: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
