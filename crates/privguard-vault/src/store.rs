//! Key-value storage capability with an expiry convention.
//!
//! Small bits of client state (theme, temp mailbox session) live behind the
//! [`KvStore`] trait and are injected where needed instead of being read
//! from ambient global state. Expiring values store a sibling key
//! `<key>.expiresAt` holding the deadline in Unix epoch milliseconds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::VaultError;

/// Suffix of the sibling key holding an expiry deadline.
pub const EXPIRY_SUFFIX: &str = ".expiresAt";

/// String-keyed, string-valued storage.
pub trait KvStore {
    /// Value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, VaultError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), VaultError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] if the backing storage cannot be written.
    fn delete(&mut self, key: &str) -> Result<(), VaultError>;

    /// Store `value` under `key` with a deadline of `expires_at_ms`.
    ///
    /// # Errors
    ///
    /// Propagates [`KvStore::set`] failures.
    fn set_with_expiry(
        &mut self,
        key: &str,
        value: &str,
        expires_at_ms: u64,
    ) -> Result<(), VaultError> {
        self.set(key, value)?;
        self.set(&expiry_key(key), &expires_at_ms.to_string())
    }

    /// Value under `key` if its deadline is after `now_ms`.
    ///
    /// Expired values are deleted. A value without a readable deadline is
    /// treated as expired.
    ///
    /// # Errors
    ///
    /// Propagates [`KvStore::get`] and [`KvStore::delete`] failures.
    fn get_unexpired(&mut self, key: &str, now_ms: u64) -> Result<Option<String>, VaultError> {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };
        let deadline = self
            .get(&expiry_key(key))?
            .and_then(|raw| raw.parse::<u64>().ok());
        match deadline {
            Some(deadline) if now_ms < deadline => Ok(Some(value)),
            _ => {
                self.delete(key)?;
                self.delete(&expiry_key(key))?;
                Ok(None)
            }
        }
    }
}

/// Sibling key holding the deadline of `key`.
#[must_use]
pub fn expiry_key(key: &str) -> String {
    format!("{key}{EXPIRY_SUFFIX}")
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store, mostly for tests and one-shot commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, VaultError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), VaultError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), VaultError> {
        self.values.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

const STORE_FILE: &str = "store.json";

/// Store persisted as one JSON object in `{data_dir}/store.json`.
///
/// Every mutation rewrites the file atomically. A missing or corrupt file
/// opens as an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tmp: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store in `data_dir`.
    #[must_use]
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(STORE_FILE);
        let values = fs::read_to_string(&path).map_or_else(
            |_| BTreeMap::new(),
            |contents| serde_json::from_str(&contents).unwrap_or_default(),
        );
        Self {
            tmp: data_dir.join(".store.json.tmp"),
            path,
            values,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to `.tmp`, then rename over the real file.
    fn persist(&self) -> Result<(), VaultError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.tmp, json)?;

        // Owner-only: the store holds mailbox bearer tokens.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&self.tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, VaultError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), VaultError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.persist()
    }

    fn delete(&mut self, key: &str) -> Result<(), VaultError> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
