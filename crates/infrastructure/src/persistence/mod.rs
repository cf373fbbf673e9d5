//! File-backed persistence.

mod error;
mod file_storage;

pub use error::StorageError;
pub use file_storage::FileKeyValueStorage;
