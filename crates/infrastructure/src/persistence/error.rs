//! Storage error type.

use reqx_application::ApplicationError;

use crate::serialization::SerializationError;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Could not determine a data directory.
    #[error("Could not determine data directory; set REQX_DATA_DIR")]
    NoDataDir,

    /// The key cannot be used as a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error.to_string())
    }
}
