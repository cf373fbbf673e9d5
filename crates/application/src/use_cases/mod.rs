//! Application use cases (business logic orchestration).

mod saved_requests;
mod send_request;
mod variables;

pub use saved_requests::*;
pub use send_request::*;
pub use variables::*;

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory port implementations shared by the use case tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::ports::KeyValueStorage;
    use crate::{ApplicationError, ApplicationResult};

    /// Storage backed by a map.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        values: Mutex<HashMap<String, String>>,
    }

    impl MemoryStorage {
        pub fn with(key: &str, value: &str) -> Self {
            let storage = Self::default();
            if let Ok(mut values) = storage.values.lock() {
                values.insert(key.to_string(), value.to_string());
            }
            storage
        }

        pub fn value(&self, key: &str) -> Option<String> {
            self.values.lock().ok()?.get(key).cloned()
        }
    }

    fn poisoned() -> ApplicationError {
        ApplicationError::Storage("lock poisoned".to_string())
    }

    impl KeyValueStorage for MemoryStorage {
        async fn get(&self, key: &str) -> ApplicationResult<Option<String>> {
            Ok(self.values.lock().map_err(|_| poisoned())?.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> ApplicationResult<()> {
            self.values
                .lock()
                .map_err(|_| poisoned())?
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> ApplicationResult<()> {
            self.values.lock().map_err(|_| poisoned())?.remove(key);
            Ok(())
        }
    }
}
