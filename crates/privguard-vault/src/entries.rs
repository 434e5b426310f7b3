//! Vault entry model and request DTOs.
//!
//! Storage lives in the backend; this module owns the wire shapes, the
//! strength score attached to every write, and the list operations the
//! vault view performs locally (search filter, grouping by domain).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use privguard_core::strength;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A stored credential as returned by the backend.
///
/// The detail endpoint includes the decrypted password; listing entries
/// leave it empty. `Debug` masks the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    pub id: String,
    pub service: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Score recorded at write time (0–100).
    #[serde(default)]
    pub strength: u8,
}

impl fmt::Debug for VaultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultEntry")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("domain", &self.domain)
            .field("logo", &self.logo)
            .field("notes", &self.notes.as_ref().map(|_| "***"))
            .field("password", &"***")
            .field("strength", &self.strength)
            .finish()
    }
}

impl VaultEntry {
    /// Whether `query` matches service or domain, case-insensitively.
    ///
    /// An empty query matches every entry.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.service.to_lowercase().contains(&needle)
            || self.domain.to_lowercase().contains(&needle)
    }

    /// Apply a successful password update locally.
    pub fn apply_password_update(&mut self, update: &UpdatePasswordRequest) {
        self.password.clone_from(&update.password);
        self.strength = update.strength;
    }

    /// Apply a successful notes update locally.
    pub fn apply_notes_update(&mut self, update: &UpdateNotesRequest) {
        self.notes = Some(update.notes.clone());
    }
}

/// Body of `GET /api/protected/vault`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultListing {
    #[serde(default)]
    pub vault: Vec<VaultEntry>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/protected/vault/add`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddEntryRequest {
    pub service: String,
    pub domain: String,
    pub logo: String,
    pub password: String,
    pub notes: String,
    pub strength: u8,
}

impl fmt::Debug for AddEntryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddEntryRequest")
            .field("service", &self.service)
            .field("domain", &self.domain)
            .field("password", &"***")
            .field("strength", &self.strength)
            .finish_non_exhaustive()
    }
}

impl AddEntryRequest {
    /// Build an add request for `service`, scoring `password` canonically.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Validation`] if no service is selected or the
    /// password is empty.
    pub fn new(
        service: &ServiceSuggestion,
        password: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<Self, VaultError> {
        let password = password.into();
        if service.name.trim().is_empty() || password.is_empty() {
            return Err(VaultError::Validation(
                "select a service and enter a password".into(),
            ));
        }
        Ok(Self {
            service: service.name.clone(),
            domain: service.domain.clone(),
            logo: service
                .logo
                .clone()
                .unwrap_or_else(|| logo_url(&service.domain)),
            strength: strength::score(&password),
            password,
            notes: notes.into(),
        })
    }
}

/// Body of `POST /api/protected/vault/{id}/update-password`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
    pub strength: u8,
}

impl fmt::Debug for UpdatePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdatePasswordRequest")
            .field("password", &"***")
            .field("strength", &self.strength)
            .finish()
    }
}

impl UpdatePasswordRequest {
    /// # Errors
    ///
    /// Returns [`VaultError::Validation`] if `password` is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, VaultError> {
        let password = password.into();
        if password.is_empty() {
            return Err(VaultError::Validation("password must not be empty".into()));
        }
        Ok(Self {
            strength: strength::score(&password),
            password,
        })
    }
}

/// Body of `POST /api/protected/vault/{id}/update-note`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Service autocomplete
// ---------------------------------------------------------------------------

/// One company suggestion from the logo/name autocomplete service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSuggestion {
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub logo: Option<String>,
}

const LOGO_BASE_URL: &str = "https://logo.clearbit.com/";

/// Logo URL for `domain` on the logo service.
#[must_use]
pub fn logo_url(domain: &str) -> String {
    format!("{LOGO_BASE_URL}{}", domain.trim())
}

// ---------------------------------------------------------------------------
// Backend routes
// ---------------------------------------------------------------------------

/// Path builders for the vault endpoints, relative to the backend base URL.
#[derive(Debug, Clone)]
pub struct VaultApiRoutes {
    base: String,
}

impl VaultApiRoutes {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: format!("{}/api/protected/vault", base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn list(&self) -> String {
        self.base.clone()
    }

    #[must_use]
    pub fn add(&self) -> String {
        format!("{}/add", self.base)
    }

    /// Used for both `GET` (detail) and `DELETE`.
    #[must_use]
    pub fn entry(&self, id: &str) -> String {
        format!("{}/{id}", self.base)
    }

    #[must_use]
    pub fn update_password(&self, id: &str) -> String {
        format!("{}/{id}/update-password", self.base)
    }

    #[must_use]
    pub fn update_notes(&self, id: &str) -> String {
        format!("{}/{id}/update-note", self.base)
    }
}

// ---------------------------------------------------------------------------
// List operations
// ---------------------------------------------------------------------------

/// Entries sharing one domain, in list order.
#[derive(Debug, Clone)]
pub struct DomainGroup<'a> {
    pub domain: &'a str,
    pub entries: Vec<&'a VaultEntry>,
}

impl DomainGroup<'_> {
    /// Whether the group holds more than one entry (rendered collapsible).
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.entries.len() > 1
    }
}

/// Entries whose service or domain contains `query` (case-insensitive).
#[must_use]
pub fn filter_entries<'a>(entries: &'a [VaultEntry], query: &str) -> Vec<&'a VaultEntry> {
    entries.iter().filter(|e| e.matches(query)).collect()
}

/// Group entries by exact domain, groups ordered by first appearance.
#[must_use]
pub fn group_by_domain<'a>(entries: &[&'a VaultEntry]) -> Vec<DomainGroup<'a>> {
    let mut groups: Vec<DomainGroup<'a>> = Vec::new();
    for &entry in entries {
        match groups.iter_mut().find(|g| g.domain == entry.domain) {
            Some(group) => group.entries.push(entry),
            None => groups.push(DomainGroup {
                domain: &entry.domain,
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// Find an entry by id.
///
/// # Errors
///
/// Returns [`VaultError::EntryNotFound`] if no entry has `id`.
pub fn find_entry<'a>(entries: &'a [VaultEntry], id: &str) -> Result<&'a VaultEntry, VaultError> {
    entries
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| VaultError::EntryNotFound(id.to_owned()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
