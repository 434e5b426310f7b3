//! Error type for the command-line shell.

use thiserror::Error;

use privguard_core::CoreError;
use privguard_vault::VaultError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Transport failure talking to a remote service.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidInput(String),

    /// A remote service answered with a non-success status.
    #[error("{service} returned HTTP {status}")]
    Api { service: &'static str, status: u16 },
}

impl AppError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput(_) => 2,
            Self::Http(_) | Self::Api { .. } => 3,
            _ => 1,
        }
    }
}
