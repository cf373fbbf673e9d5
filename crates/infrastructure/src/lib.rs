//! Reqx Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::SystemClock;
pub use config::{DATA_DIR_ENV, StorageConfig};
pub use persistence::{FileKeyValueStorage, StorageError};
pub use serialization::{SerializationError, from_json, normalize_json, to_json_stable};
