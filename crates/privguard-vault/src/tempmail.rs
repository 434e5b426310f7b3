//! Disposable mailbox session and message model.
//!
//! The mailbox provider issues an address and a bearer token. The session
//! is cached in a [`KvStore`] and reused until its TTL runs out, so
//! repeated visits keep showing the same inbox. The token is stored with
//! the store's `<key>.expiresAt` deadline.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::store::{expiry_key, KvStore};

/// Default session lifetime: 6.5 days.
pub const DEFAULT_SESSION_TTL_MS: u64 = 561_600_000;

const KEY_ADDRESS: &str = "tempEmail";
const KEY_CREATED_AT: &str = "tempEmailTime";
const KEY_TOKEN: &str = "tempAuthToken";

const LOCAL_PART_LEN: usize = 8;
const LOCAL_PART_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An issued mailbox. `Debug` masks the token.
#[derive(Clone, PartialEq, Eq)]
pub struct TempMailSession {
    pub address: String,
    pub token: String,
    pub created_at_ms: u64,
}

impl fmt::Debug for TempMailSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempMailSession")
            .field("address", &self.address)
            .field("token", &"***")
            .field("created_at_ms", &self.created_at_ms)
            .finish()
    }
}

impl TempMailSession {
    /// Whether the session is younger than `ttl_ms` at `now_ms`.
    ///
    /// A creation time in the future (clock skew) is never fresh.
    #[must_use]
    pub const fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        match now_ms.checked_sub(self.created_at_ms) {
            Some(age) => age < ttl_ms,
            None => false,
        }
    }

    /// Deadline after which the session must not be reused.
    #[must_use]
    pub const fn expires_at_ms(&self, ttl_ms: u64) -> u64 {
        self.created_at_ms.saturating_add(ttl_ms)
    }
}

/// Reads and writes the current session through a [`KvStore`].
#[derive(Debug)]
pub struct SessionCache<S> {
    store: S,
    ttl_ms: u64,
}

impl<S: KvStore> SessionCache<S> {
    #[must_use]
    pub const fn new(store: S, ttl_ms: u64) -> Self {
        Self { store, ttl_ms }
    }

    /// The cached session, if the token's deadline has not passed and the
    /// session is still fresh under the current TTL.
    ///
    /// An expired or incomplete session is removed from the store.
    ///
    /// # Errors
    ///
    /// Propagates store read and write failures.
    pub fn load(&mut self, now_ms: u64) -> Result<Option<TempMailSession>, VaultError> {
        let Some(token) = self.store.get_unexpired(KEY_TOKEN, now_ms)? else {
            self.clear()?;
            return Ok(None);
        };
        let address = self.store.get(KEY_ADDRESS)?.unwrap_or_default();
        let created_at_ms = self
            .store
            .get(KEY_CREATED_AT)?
            .and_then(|raw| raw.parse::<u64>().ok());

        let session = match created_at_ms {
            Some(created_at_ms) if !address.is_empty() && !token.is_empty() => TempMailSession {
                address,
                token,
                created_at_ms,
            },
            _ => {
                self.clear()?;
                return Ok(None);
            }
        };
        if !session.is_fresh(now_ms, self.ttl_ms) {
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Remember `session` as the current one, expiring after the TTL.
    ///
    /// # Errors
    ///
    /// Propagates store write failures.
    pub fn save(&mut self, session: &TempMailSession) -> Result<(), VaultError> {
        self.store.set(KEY_ADDRESS, &session.address)?;
        self.store
            .set(KEY_CREATED_AT, &session.created_at_ms.to_string())?;
        self.store.set_with_expiry(
            KEY_TOKEN,
            &session.token,
            session.expires_at_ms(self.ttl_ms),
        )
    }

    /// Forget the current session.
    ///
    /// # Errors
    ///
    /// Propagates store write failures.
    pub fn clear(&mut self) -> Result<(), VaultError> {
        self.store.delete(KEY_ADDRESS)?;
        self.store.delete(KEY_CREATED_AT)?;
        self.store.delete(KEY_TOKEN)?;
        self.store.delete(&expiry_key(KEY_TOKEN))
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Random 8-character `[a-z0-9]` local part for a new address.
pub fn random_local_part<R: Rng>(rng: &mut R) -> String {
    (0..LOCAL_PART_LEN)
        .map(|_| char::from(LOCAL_PART_ALPHABET[rng.gen_range(0..LOCAL_PART_ALPHABET.len())]))
        .collect()
}

// ---------------------------------------------------------------------------
// Provider wire model
// ---------------------------------------------------------------------------

/// Hydra-style collection wrapper (`{"hydra:member": [...]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydraCollection<T> {
    #[serde(rename = "hydra:member", default = "Vec::new")]
    pub members: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailDomain {
    pub domain: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// First active domain offered by the provider.
///
/// # Errors
///
/// Returns [`VaultError::Validation`] if no active domain is available.
pub fn pick_domain(domains: &[MailDomain]) -> Result<&str, VaultError> {
    domains
        .iter()
        .find(|d| d.is_active)
        .map(|d| d.domain.as_str())
        .ok_or_else(|| VaultError::Validation("no mailbox domains available".into()))
}

/// Body of the account-creation and token requests. `Debug` masks the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountCredentials {
    pub address: String,
    pub password: String,
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("address", &self.address)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenResponse { token: \"***\" }")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAddress {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl fmt::Display for MailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// A message in the inbox listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    pub id: String,
    pub from: MailAddress,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub intro: String,
    pub created_at: String,
    #[serde(default)]
    pub seen: bool,
}

/// A fully fetched message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDetail {
    pub id: String,
    pub from: MailAddress,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub html: Vec<String>,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Local inbox state
// ---------------------------------------------------------------------------

/// The inbox as last polled.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    messages: Vec<MailMessage>,
}

impl Inbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[MailMessage] {
        &self.messages
    }

    /// Replace the listing with a fresh poll result and return the messages
    /// that were not present before.
    pub fn replace(&mut self, polled: Vec<MailMessage>) -> Vec<MailMessage> {
        let arrived = polled
            .iter()
            .filter(|m| !self.messages.iter().any(|old| old.id == m.id))
            .cloned()
            .collect();
        self.messages = polled;
        arrived
    }

    /// Drop a message locally. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
