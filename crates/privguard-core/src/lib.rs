//! `privguard-core`: Password quality engine.
//!
//! Pure and synchronous: zero network, zero storage, zero logging. The only
//! resource consumed is entropy from the OS CSPRNG.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;

pub mod password;

pub mod strength;

pub mod breach;

pub mod identity;

pub use breach::{parse_range_body, RangeEntry, RangeQuery, RANGE_PREFIX_LEN};
pub use error::CoreError;
pub use identity::{generate_identity, generate_identity_with, FakeIdentity};
pub use password::charset::{covers_all_classes, CharacterClass, AMBIGUOUS, POOL};
pub use password::{
    generate_password, generate_password_with, generate_random_password, DEFAULT_PASSWORD_LENGTH,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use strength::{
    assess, label_for, score, ScoringRule, StrengthAssessment, StrengthLabel, StrengthScheme,
    CANONICAL_RULES, MAX_SCORE,
};
