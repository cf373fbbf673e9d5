//! Key-value storage on the local file system.

use std::io::ErrorKind;
use std::path::PathBuf;

use reqx_application::ApplicationResult;
use reqx_application::ports::KeyValueStorage;
use tokio::fs;

use super::error::StorageError;
use crate::config::StorageConfig;
use crate::serialization::normalize_json;

/// Stores each key as `<data_dir>/<key>.json`.
///
/// JSON values are rewritten in the stable layout so repeated saves of
/// the same data produce identical files. Writes go through a temporary
/// file and a rename, so a crash never leaves a half-written key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStorage {
    config: StorageConfig,
}

impl FileKeyValueStorage {
    /// Creates a storage rooted at the configured data directory.
    #[must_use]
    pub const fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.config.path_for(key))
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => {
                tracing::debug!(key, path = %path.display(), "Read storage key");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        let content = match normalize_json(value) {
            Ok(json) => json,
            Err(_) => {
                tracing::warn!(key, "Value is not JSON, storing it verbatim");
                value.to_string()
            }
        };

        fs::create_dir_all(&self.config.data_dir).await?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        tracing::info!(key, path = %path.display(), bytes = content.len(), "Wrote storage key");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key, "Removed storage key");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStorage for FileKeyValueStorage {
    async fn get(&self, key: &str) -> ApplicationResult<Option<String>> {
        Ok(self.read(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> ApplicationResult<()> {
        Ok(self.write(key, value).await?)
    }

    async fn remove(&self, key: &str) -> ApplicationResult<()> {
        Ok(self.delete(key).await?)
    }
}
