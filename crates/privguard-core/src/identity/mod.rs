//! Throwaway identity generation for sign-up forms.
//!
//! A [`FakeIdentity`] pairs a plausible name with a username, a disposable
//! address, a generated password, an avatar URL and a filler bio. Nothing
//! here is tied to a real person.

pub mod names;

use std::fmt;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::password;
use names::{FIRST_NAMES, LAST_NAMES, LOREM, TEMP_DOMAINS};

/// Password length for generated identities.
pub const IDENTITY_PASSWORD_LENGTH: usize = 12;

const AVATAR_BASE_URL: &str = "https://avatars.githubusercontent.com/u/";
const MIN_BIO_WORDS: usize = 6;
const MAX_BIO_WORDS: usize = 12;
const USERNAME_SEPARATORS: &[&str] = &[".", "_"];

/// A generated identity. `Debug` masks the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FakeIdentity {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: String,
    pub bio: String,
}

impl fmt::Debug for FakeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeIdentity")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("avatar", &self.avatar)
            .field("bio", &self.bio)
            .finish()
    }
}

/// Generate an identity from `OsRng`.
#[must_use]
pub fn generate_identity() -> FakeIdentity {
    generate_identity_with(&mut OsRng)
}

/// Generate an identity from a caller-supplied CSPRNG.
pub fn generate_identity_with<R: Rng + CryptoRng>(rng: &mut R) -> FakeIdentity {
    let first = pick_word(rng, FIRST_NAMES);
    let last = pick_word(rng, LAST_NAMES);
    let username = username_for(rng, first, last);
    let domain = pick_word(rng, TEMP_DOMAINS);

    FakeIdentity {
        name: format!("{first} {last}"),
        email: format!("{username}@{domain}"),
        password: password::compose(rng, IDENTITY_PASSWORD_LENGTH),
        avatar: format!("{AVATAR_BASE_URL}{}", rng.gen_range(1_000u32..100_000_000)),
        bio: sentence(rng),
        username,
    }
}

fn pick_word<R: Rng>(rng: &mut R, words: &'static [&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

/// `first.last` or `first_last`, lowercase, with an optional one- or
/// two-digit suffix.
fn username_for<R: Rng>(rng: &mut R, first: &str, last: &str) -> String {
    let separator = pick_word(rng, USERNAME_SEPARATORS);
    let mut username = format!("{first}{separator}{last}").to_lowercase();
    if rng.gen_bool(0.5) {
        username.push_str(&rng.gen_range(1u8..100).to_string());
    }
    username
}

/// A capitalized filler sentence ending with a period.
fn sentence<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(MIN_BIO_WORDS..=MAX_BIO_WORDS);
    let words: Vec<&str> = (0..count).map(|_| pick_word(rng, LOREM)).collect();
    let mut text = words.join(" ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::charset::covers_all_classes;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn email_uses_username_and_temp_domain() {
        for _ in 0..50 {
            let identity = generate_identity();
            let (local, domain) = identity.email.split_once('@').unwrap();
            assert_eq!(local, identity.username);
            assert!(TEMP_DOMAINS.contains(&domain), "unexpected domain {domain}");
        }
    }

    #[test]
    fn username_is_lowercase_name_derived() {
        let identity = generate_identity();
        assert_eq!(identity.username, identity.username.to_lowercase());
        let first = identity.name.split(' ').next().unwrap().to_lowercase();
        assert!(identity.username.starts_with(&first));
    }

    #[test]
    fn username_separates_first_and_last_name() {
        for seed in 0..64 {
            let identity = generate_identity_with(&mut StdRng::seed_from_u64(seed));
            let mut parts = identity.name.split(' ');
            let first = parts.next().unwrap().to_lowercase();
            let last = parts.next().unwrap().to_lowercase();
            let rest = identity.username.strip_prefix(&first).unwrap();
            assert!(
                rest.starts_with(&format!(".{last}")) || rest.starts_with(&format!("_{last}")),
                "unexpected username {}",
                identity.username
            );
            let suffix = rest[1 + last.len()..].to_owned();
            assert!(suffix.len() <= 2 && suffix.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn password_is_generated_with_all_classes() {
        let identity = generate_identity();
        assert_eq!(identity.password.len(), IDENTITY_PASSWORD_LENGTH);
        assert!(covers_all_classes(&identity.password));
    }

    #[test]
    fn bio_is_a_capitalized_sentence() {
        let bio = generate_identity().bio;
        assert!(bio.ends_with('.'));
        assert!(bio.chars().next().unwrap().is_ascii_uppercase());
        let words = bio.trim_end_matches('.').split(' ').count();
        assert!((MIN_BIO_WORDS..=MAX_BIO_WORDS).contains(&words));
    }

    #[test]
    fn avatar_points_at_avatar_host() {
        assert!(generate_identity().avatar.starts_with(AVATAR_BASE_URL));
    }

    #[test]
    fn seeded_identity_is_reproducible() {
        let a = generate_identity_with(&mut StdRng::seed_from_u64(42));
        let b = generate_identity_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn debug_masks_password() {
        let identity = generate_identity();
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains(&identity.password));
        assert!(rendered.contains("***"));
    }
}
