//! Load and save variables.

use reqx_domain::VariableStore;
use reqx_domain::persistence::VARIABLES_KEY;

use crate::ApplicationResult;
use crate::ports::KeyValueStorage;

/// Use case for loading the variable store.
///
/// The blob has no legacy shapes to migrate. An unreadable one is
/// replaced by an empty store.
pub struct LoadVariables<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> LoadVariables<S> {
    /// Creates a new `LoadVariables` use case.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads the stored variables.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage itself cannot be read.
    pub async fn execute(&self) -> ApplicationResult<VariableStore> {
        let Some(json) = self.storage.get(VARIABLES_KEY).await? else {
            return Ok(VariableStore::new());
        };

        let store: VariableStore = match serde_json::from_str(&json) {
            Ok(store) => store,
            Err(error) => {
                tracing::warn!(%error, "Stored variables are unreadable, starting empty");
                return Ok(VariableStore::new());
            }
        };

        if store.has_dangling_active_environment() {
            tracing::warn!(
                environment_id = ?store.active_environment_id,
                "Active environment no longer exists"
            );
        }
        tracing::info!(
            globals = store.scope.global.len(),
            environments = store.environments.len(),
            "Loaded variables"
        );
        Ok(store)
    }
}

/// Use case for persisting the variable store.
pub struct SaveVariables<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> SaveVariables<S> {
    /// Creates a new `SaveVariables` use case.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes the store under the variables key.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub async fn execute(&self, store: &VariableStore) -> ApplicationResult<()> {
        let json = serde_json::to_string_pretty(store)?;
        self.storage.set(VARIABLES_KEY, &json).await?;
        tracing::info!("Variables persisted");
        Ok(())
    }
}
