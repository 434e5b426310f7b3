//! Cryptographic password generation.
//!
//! Every generated password holds at least one symbol from each of the four
//! [`CharacterClass`]es. The remaining positions are drawn uniformly from the
//! union [`charset::POOL`], then the whole sequence is Fisher-Yates shuffled so
//! the mandatory symbols do not sit at predictable positions.
//!
//! All randomness comes from `OsRng` unless the caller injects a generator.

pub mod charset;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

use crate::error::CoreError;
use charset::{CharacterClass, POOL};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum allowed password length: one slot per character class.
pub const MIN_PASSWORD_LENGTH: usize = CharacterClass::ALL.len();

/// Maximum allowed password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Length produced by [`generate_password`].
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate a [`DEFAULT_PASSWORD_LENGTH`]-character password from `OsRng`.
///
/// Total: never fails.
#[must_use]
pub fn generate_password() -> String {
    compose(&mut OsRng, DEFAULT_PASSWORD_LENGTH)
}

/// Generate a password of `length` characters from `OsRng`.
///
/// # Errors
///
/// Returns [`CoreError::PasswordGeneration`] if `length` is outside
/// [`MIN_PASSWORD_LENGTH`]..=[`MAX_PASSWORD_LENGTH`].
pub fn generate_random_password(length: usize) -> Result<String, CoreError> {
    generate_password_with(&mut OsRng, length)
}

/// Generate a password of `length` characters from a caller-supplied CSPRNG.
///
/// # Errors
///
/// Returns [`CoreError::PasswordGeneration`] if `length` is outside
/// [`MIN_PASSWORD_LENGTH`]..=[`MAX_PASSWORD_LENGTH`].
pub fn generate_password_with<R: Rng + CryptoRng>(
    rng: &mut R,
    length: usize,
) -> Result<String, CoreError> {
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(CoreError::PasswordGeneration(format!(
            "length must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH}, got {length}"
        )));
    }
    Ok(compose(rng, length))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Build a password of `length` (>= [`MIN_PASSWORD_LENGTH`]) characters.
pub(crate) fn compose<R: Rng + CryptoRng>(rng: &mut R, length: usize) -> String {
    let mut chars: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::with_capacity(length));

    // Mandatory symbols first, one per class.
    for class in CharacterClass::ALL {
        chars.push(pick(rng, class.symbols()));
    }
    while chars.len() < length {
        chars.push(pick(rng, POOL));
    }

    // Fisher-Yates: i from last to first, swap with uniform j in [0, i].
    chars.shuffle(rng);

    chars.iter().copied().map(char::from).collect()
}

fn pick<R: Rng>(rng: &mut R, symbols: &[u8]) -> u8 {
    symbols[rng.gen_range(0..symbols.len())]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
