//! Error types for `privguard-vault`.

use thiserror::Error;
use privguard_core::CoreError;

/// Errors produced by client-side vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Password engine failure (delegated from core).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request failed client-side validation before being sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Entry not found by ID.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// JSON encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
