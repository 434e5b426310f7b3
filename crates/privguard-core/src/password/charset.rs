//! Character classes used to compose generated passwords.
//!
//! The four classes are disjoint and exclude visually ambiguous glyphs
//! (`I`, `O`, `l`, `0`, `1`) so generated passwords survive being read
//! aloud or copied by hand.

use serde::{Deserialize, Serialize};

const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SPECIAL: &[u8] = b"!@#$%^&*_-+=";

/// Union of all four classes, in class order.
pub const POOL: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%^&*_-+=";

/// Glyphs that never appear in generated passwords.
pub const AMBIGUOUS: &[u8] = b"IOl01";

/// One of the four disjoint symbol sets a generated password draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharacterClass {
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl CharacterClass {
    /// All classes, in the order mandatory characters are drawn.
    pub const ALL: [Self; 4] = [
        Self::Uppercase,
        Self::Lowercase,
        Self::Digit,
        Self::Special,
    ];

    /// The allowed symbols of this class.
    #[must_use]
    pub const fn symbols(self) -> &'static [u8] {
        match self {
            Self::Uppercase => UPPERCASE,
            Self::Lowercase => LOWERCASE,
            Self::Digit => DIGITS,
            Self::Special => SPECIAL,
        }
    }

    /// Whether `c` belongs to the allowed set of this class.
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        u8::try_from(c).is_ok_and(|b| self.symbols().contains(&b))
    }

    /// The class `c` belongs to, if any.
    #[must_use]
    pub fn classify(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.contains(c))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Digit => "digit",
            Self::Special => "special",
        }
    }
}

/// Whether `password` holds at least one allowed symbol of every class.
#[must_use]
pub fn covers_all_classes(password: &str) -> bool {
    CharacterClass::ALL
        .iter()
        .all(|class| password.chars().any(|c| class.contains(c)))
}
