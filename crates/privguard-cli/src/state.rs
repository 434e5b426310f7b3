//! Per-invocation context: data directory and loaded settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use privguard_vault::{JsonFileStore, Settings};

use crate::error::AppError;

const APP_DIR: &str = "privguard";

/// Resolved data directory plus the settings read from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    data_dir: PathBuf,
    pub settings: Settings,
}

impl AppContext {
    /// Resolve the data directory (explicit path or the platform config
    /// dir), create it if needed and load settings from it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if no directory was given and the
    /// platform has no config directory, or [`AppError::Io`] if it cannot
    /// be created.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self, AppError> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)?;
        tracing::debug!(path = %data_dir.display(), "using data directory");
        Ok(Self {
            settings: Settings::load(&data_dir),
            data_dir,
        })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Key-value store in the data directory.
    #[must_use]
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::open(&self.data_dir)
    }
}

/// `{config_dir}/privguard`.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if the platform has no config directory.
pub fn default_data_dir() -> Result<PathBuf, AppError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| {
            AppError::InvalidInput("cannot determine a config directory; pass --data-dir".into())
        })
}

/// Wall-clock time in Unix epoch milliseconds.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
