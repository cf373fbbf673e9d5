//! Storage port

use std::future::Future;

use crate::ApplicationResult;

/// Durable key-value storage holding JSON strings.
///
/// Mirrors the browser-style storage the saved state lives in: each key
/// (`reqx_saved_requests`, `reqx_variables`) maps to one JSON document.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> impl Future<Output = ApplicationResult<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = ApplicationResult<()>> + Send;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> impl Future<Output = ApplicationResult<()>> + Send;
}

impl<T: KeyValueStorage> KeyValueStorage for &T {
    fn get(&self, key: &str) -> impl Future<Output = ApplicationResult<Option<String>>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = ApplicationResult<()>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = ApplicationResult<()>> + Send {
        (**self).remove(key)
    }
}
