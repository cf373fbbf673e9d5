//! Load and save the saved requests blob.

use reqx_domain::SavedRequestsSnapshot;
use reqx_domain::persistence::{SAVED_REQUESTS_KEY, migrate_saved_requests};

use crate::ApplicationResult;
use crate::ports::KeyValueStorage;

/// Use case for loading saved requests and folders.
///
/// Runs the legacy migration on whatever is stored. A missing key or a
/// blob that is not even a JSON object yields an empty snapshot.
pub struct LoadSavedRequests<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> LoadSavedRequests<S> {
    /// Creates a new `LoadSavedRequests` use case.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads and migrates the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage itself cannot be read.
    pub async fn execute(&self) -> ApplicationResult<SavedRequestsSnapshot> {
        let Some(json) = self.storage.get(SAVED_REQUESTS_KEY).await? else {
            tracing::info!("No saved requests stored yet");
            return Ok(SavedRequestsSnapshot::default());
        };

        match migrate_saved_requests(&json) {
            Ok((snapshot, report)) => {
                if !report.is_clean() {
                    tracing::info!(?report, "Migrated legacy saved requests");
                }
                tracing::info!(
                    requests = snapshot.saved_requests.len(),
                    folders = snapshot.saved_folders.len(),
                    "Loaded saved requests"
                );
                Ok(snapshot)
            }
            Err(error) => {
                tracing::warn!(%error, "Stored saved requests are unreadable, starting empty");
                Ok(SavedRequestsSnapshot::default())
            }
        }
    }
}

/// Use case for persisting saved requests and folders.
pub struct SaveSavedRequests<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> SaveSavedRequests<S> {
    /// Creates a new `SaveSavedRequests` use case.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes the snapshot under the saved requests key.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub async fn execute(&self, snapshot: &SavedRequestsSnapshot) -> ApplicationResult<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        self.storage.set(SAVED_REQUESTS_KEY, &json).await?;
        tracing::info!(
            requests = snapshot.saved_requests.len(),
            folders = snapshot.saved_folders.len(),
            "Saved requests persisted"
        );
        Ok(())
    }
}
