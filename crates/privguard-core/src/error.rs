//! Error types for `privguard-core`.

use thiserror::Error;

/// Errors produced by the fallible parts of the password engine.
///
/// Scoring and default-length generation are total and never return these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Password generation with caller-supplied parameters failed.
    #[error("password generation error: {0}")]
    PasswordGeneration(String),

    /// A custom strength scheme has inconsistent thresholds.
    #[error("invalid strength scheme: {0}")]
    InvalidScheme(String),

    /// A k-anonymity range response line could not be parsed.
    #[error("malformed range response at line {line}: {reason}")]
    RangeResponse {
        /// 1-based line number in the response body.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}
