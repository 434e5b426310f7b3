//! `privguard generate`
//!
//! Stateless: wraps `privguard_core::password` for the terminal. Generated
//! values go to stdout only and are never logged.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use privguard_core::password::{self, DEFAULT_PASSWORD_LENGTH};
use privguard_core::strength;

use crate::commands::write_json;
use crate::error::AppError;

/// Upper bound on `--count`.
pub const MAX_COUNT: usize = 100;

// ---------------------------------------------------------------------------
// Arguments and DTOs
// ---------------------------------------------------------------------------

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Password length (4-128)
    #[arg(short, long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
    pub length: usize,

    /// Number of passwords to generate
    #[arg(short, long, default_value_t = 1)]
    pub count: usize,

    /// Print JSON instead of one password per line
    #[arg(long)]
    pub json: bool,
}

/// One generated password with its canonical score.
///
/// `Debug` is manually implemented to mask the generated value and prevent
/// accidental logging of secret material.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePasswordResult {
    pub value: String,
    pub score: u8,
}

impl std::fmt::Debug for GeneratePasswordResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratePasswordResult")
            .field("value", &"***")
            .field("score", &self.score)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Generate `args.count` passwords of `args.length` characters.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if the count is outside `1..=100`,
/// or [`AppError::Core`] if the length is outside the supported range.
pub fn generate_passwords(args: &GenerateArgs) -> Result<Vec<GeneratePasswordResult>, AppError> {
    if !(1..=MAX_COUNT).contains(&args.count) {
        return Err(AppError::InvalidInput(format!(
            "count must be between 1 and {MAX_COUNT}, got {}",
            args.count
        )));
    }
    (0..args.count)
        .map(|_| {
            let value = password::generate_random_password(args.length)?;
            Ok(GeneratePasswordResult {
                score: strength::score(&value),
                value,
            })
        })
        .collect()
}

/// # Errors
///
/// See [`generate_passwords`]; also [`AppError::Io`] on write failure.
pub fn generate(args: &GenerateArgs, out: &mut dyn Write) -> Result<(), AppError> {
    let results = generate_passwords(args)?;
    tracing::debug!(count = results.len(), length = args.length, "generated passwords");
    if args.json {
        return write_json(out, &results);
    }
    for result in &results {
        writeln!(out, "{}", result.value)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
