//! k-anonymity password breach lookup (client side).
//!
//! The candidate password is hashed locally with SHA-1; only the first
//! [`RANGE_PREFIX_LEN`] hex characters of the digest leave the machine. The
//! range service answers with every known suffix sharing that prefix, one
//! `SUFFIX:COUNT` pair per line, and the match is resolved here.
//!
//! This module performs no I/O. Fetching the range body is the caller's job.

use std::fmt;

use data_encoding::HEXUPPER;
use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of hex characters sent to the range service.
pub const RANGE_PREFIX_LEN: usize = 5;

/// Number of hex characters in a full SHA-1 digest.
const SHA1_HEX_LEN: usize = 40;

/// One `SUFFIX:COUNT` line of a range response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeEntry {
    pub suffix: String,
    pub count: u64,
}

/// A prepared range lookup for one password.
///
/// `Debug` masks the suffix: together with the prefix it is the full
/// unsalted digest of the password.
#[derive(Clone)]
pub struct RangeQuery {
    prefix: String,
    suffix: String,
}

impl fmt::Debug for RangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeQuery")
            .field("prefix", &self.prefix)
            .field("suffix", &"***")
            .finish()
    }
}

impl RangeQuery {
    /// Hash `password` and split the uppercase hex digest.
    #[must_use]
    pub fn new(password: &str) -> Self {
        let hash = digest(&SHA1_FOR_LEGACY_USE_ONLY, password.as_bytes());
        let hex = HEXUPPER.encode(hash.as_ref());
        let (prefix, suffix) = hex.split_at(RANGE_PREFIX_LEN);
        Self {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
        }
    }

    /// The part sent to the range service.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The part kept local and matched against the response.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// How many times the password appears in the range `body`; 0 if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RangeResponse`] if any line of `body` is malformed.
    pub fn breach_count(&self, body: &str) -> Result<u64, CoreError> {
        Ok(parse_range_body(body)?
            .into_iter()
            .find(|entry| entry.suffix.eq_ignore_ascii_case(&self.suffix))
            .map_or(0, |entry| entry.count))
    }
}

/// Parse a newline-delimited `SUFFIX:COUNT` range response.
///
/// CRLF line endings and blank lines are accepted. Padding entries with a
/// count of 0 are kept as-is.
///
/// # Errors
///
/// Returns [`CoreError::RangeResponse`] naming the first malformed line.
pub fn parse_range_body(body: &str) -> Result<Vec<RangeEntry>, CoreError> {
    let suffix_len = SHA1_HEX_LEN.saturating_sub(RANGE_PREFIX_LEN);
    let mut entries = Vec::new();

    for (index, raw) in body.lines().enumerate() {
        let line_no = index.saturating_add(1);
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let malformed = |reason: &str| CoreError::RangeResponse {
            line: line_no,
            reason: reason.to_owned(),
        };

        let (suffix, count) = line
            .split_once(':')
            .ok_or_else(|| malformed("missing ':' separator"))?;
        if suffix.len() != suffix_len || !suffix.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed("suffix is not a 35-character hex string"));
        }
        let count: u64 = count
            .trim()
            .parse()
            .map_err(|_| malformed("count is not a non-negative integer"))?;

        entries.push(RangeEntry {
            suffix: suffix.to_ascii_uppercase(),
            count,
        });
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
