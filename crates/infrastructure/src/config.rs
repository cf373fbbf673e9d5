//! Storage configuration.
//!
//! The data directory comes from `REQX_DATA_DIR` when set, else the
//! platform config directory:
//! - Linux: ~/.config/reqx
//! - macOS: ~/Library/Application Support/reqx
//! - Windows: %APPDATA%/reqx

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::persistence::StorageError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "REQX_DATA_DIR";

/// Where persisted keys are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding one `<key>.json` file per storage key.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Uses an explicit data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the data directory from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoDataDir`] if `REQX_DATA_DIR` is unset and
    /// the platform has no config directory.
    pub fn from_env() -> Result<Self, StorageError> {
        Self::resolve(std::env::var_os(DATA_DIR_ENV), dirs::config_dir())
    }

    fn resolve(override_dir: Option<OsString>, config_dir: Option<PathBuf>) -> Result<Self, StorageError> {
        if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
            return Ok(Self::new(dir));
        }
        config_dir
            .map(|dir| Self::new(dir.join("reqx")))
            .ok_or(StorageError::NoDataDir)
    }

    /// The file backing a storage key.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
