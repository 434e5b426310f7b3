//! Password strength scoring.
//!
//! A [`StrengthScheme`] is a table of additive [`ScoringRule`]s plus two label
//! thresholds. Every rule whose predicate matches contributes its bonus; the
//! sum is capped at [`MAX_SCORE`]. The canonical scheme backs both the vault
//! entry editor and the add-password flow so the two can never drift apart.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Upper bound of every score.
pub const MAX_SCORE: u8 = 100;

/// Scores below this are [`StrengthLabel::Weak`] under the canonical scheme.
pub const MODERATE_THRESHOLD: u8 = 40;

/// Scores at or above this are [`StrengthLabel::Strong`] under the canonical scheme.
pub const STRONG_THRESHOLD: u8 = 70;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One additive rule: `bonus` points when `applies(password)` holds.
#[derive(Clone, Copy)]
pub struct ScoringRule {
    /// Short identifier shown as feedback (e.g. `"uppercase"`).
    pub name: &'static str,
    pub bonus: u8,
    pub applies: fn(&str) -> bool,
}

impl fmt::Debug for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringRule")
            .field("name", &self.name)
            .field("bonus", &self.bonus)
            .finish_non_exhaustive()
    }
}

fn length_at_least_8(p: &str) -> bool {
    p.chars().count() >= 8
}

fn length_at_least_12(p: &str) -> bool {
    p.chars().count() >= 12
}

fn has_uppercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_uppercase())
}

fn has_lowercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_lowercase())
}

fn has_digit(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_digit())
}

/// Anything outside `[A-Za-z0-9]`, non-ASCII included.
fn has_symbol(p: &str) -> bool {
    p.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// The canonical rule table. Length tiers stack.
pub const CANONICAL_RULES: &[ScoringRule] = &[
    ScoringRule {
        name: "length8",
        bonus: 20,
        applies: length_at_least_8,
    },
    ScoringRule {
        name: "length12",
        bonus: 10,
        applies: length_at_least_12,
    },
    ScoringRule {
        name: "uppercase",
        bonus: 20,
        applies: has_uppercase,
    },
    ScoringRule {
        name: "lowercase",
        bonus: 15,
        applies: has_lowercase,
    },
    ScoringRule {
        name: "digit",
        bonus: 15,
        applies: has_digit,
    },
    ScoringRule {
        name: "symbol",
        bonus: 20,
        applies: has_symbol,
    },
];

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Discrete strength tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrengthLabel {
    Weak,
    Moderate,
    Strong,
}

impl StrengthLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and label of one password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthAssessment {
    pub score: u8,
    pub label: StrengthLabel,
}

// ---------------------------------------------------------------------------
// Scheme
// ---------------------------------------------------------------------------

/// A rule table with its two label cut points.
#[derive(Debug, Clone, Copy)]
pub struct StrengthScheme {
    rules: &'static [ScoringRule],
    moderate_at: u8,
    strong_at: u8,
}

impl StrengthScheme {
    /// The scheme used by every command and report.
    pub const CANONICAL: Self = Self {
        rules: CANONICAL_RULES,
        moderate_at: MODERATE_THRESHOLD,
        strong_at: STRONG_THRESHOLD,
    };

    /// Build a custom scheme.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidScheme`] if `moderate_at > strong_at` or
    /// `strong_at` exceeds [`MAX_SCORE`].
    pub fn new(
        rules: &'static [ScoringRule],
        moderate_at: u8,
        strong_at: u8,
    ) -> Result<Self, CoreError> {
        if moderate_at > strong_at {
            return Err(CoreError::InvalidScheme(format!(
                "moderate threshold {moderate_at} is above strong threshold {strong_at}"
            )));
        }
        if strong_at > MAX_SCORE {
            return Err(CoreError::InvalidScheme(format!(
                "strong threshold {strong_at} exceeds {MAX_SCORE}"
            )));
        }
        Ok(Self {
            rules,
            moderate_at,
            strong_at,
        })
    }

    #[must_use]
    pub const fn rules(&self) -> &'static [ScoringRule] {
        self.rules
    }

    /// Sum of the bonuses of every matching rule, capped at [`MAX_SCORE`].
    #[must_use]
    pub fn score(&self, password: &str) -> u8 {
        let total = self
            .rules
            .iter()
            .filter(|rule| (rule.applies)(password))
            .fold(0u32, |acc, rule| acc.saturating_add(u32::from(rule.bonus)));
        u8::try_from(total.min(u32::from(MAX_SCORE)))
            .unwrap_or(MAX_SCORE)
    }

    #[must_use]
    pub const fn label(&self, score: u8) -> StrengthLabel {
        if score < self.moderate_at {
            StrengthLabel::Weak
        } else if score < self.strong_at {
            StrengthLabel::Moderate
        } else {
            StrengthLabel::Strong
        }
    }

    #[must_use]
    pub fn assess(&self, password: &str) -> StrengthAssessment {
        let score = self.score(password);
        StrengthAssessment {
            score,
            label: self.label(score),
        }
    }

    /// Names of the rules that fire for `password`, in table order.
    #[must_use]
    pub fn matched_rules(&self, password: &str) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| (rule.applies)(password))
            .map(|rule| rule.name)
            .collect()
    }
}

impl Default for StrengthScheme {
    fn default() -> Self {
        Self::CANONICAL
    }
}

// ---------------------------------------------------------------------------
// Canonical shorthands
// ---------------------------------------------------------------------------

/// Canonical score of `password` in `0..=100`. Total over all inputs.
#[must_use]
pub fn score(password: &str) -> u8 {
    StrengthScheme::CANONICAL.score(password)
}

/// Canonical label for a score.
#[must_use]
pub const fn label_for(score: u8) -> StrengthLabel {
    StrengthScheme::CANONICAL.label(score)
}

/// Canonical score and label of `password`.
#[must_use]
pub fn assess(password: &str) -> StrengthAssessment {
    StrengthScheme::CANONICAL.assess(password)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
