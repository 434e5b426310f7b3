//! `privguard-vault`: Client-side vault logic.
//!
//! Entry requests and grouping, password health reports, the key-value
//! store used for small bits of client state, settings, the disposable
//! mailbox session model, and breach-analytics summaries. No network I/O
//! happens here; the CLI feeds response bodies in.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;

pub mod entries;

pub mod health;

pub mod store;

pub mod settings;

pub mod tempmail;

pub mod breach_report;

pub use breach_report::{
    parse_breach_response, summarize, BreachDetails, BreachResponse, BreachSummary, RiskLevel,
    YearCount,
};
pub use entries::{
    filter_entries, find_entry, group_by_domain, logo_url, AddEntryRequest, DomainGroup,
    ServiceSuggestion, UpdateNotesRequest, UpdatePasswordRequest, VaultApiRoutes, VaultEntry,
    VaultListing,
};
pub use error::VaultError;
pub use health::{
    analyze_password_health, CredentialRef, PasswordHealthReport, ReusedGroup, WeakCredential,
};
pub use settings::{Settings, SETTING_KEYS};
pub use store::{JsonFileStore, KvStore, MemoryStore};
pub use tempmail::{
    pick_domain, random_local_part, Inbox, MailMessage, MessageDetail, SessionCache,
    TempMailSession, DEFAULT_SESSION_TTL_MS,
};
