//! Non-sensitive client settings, stored as plain JSON in the data directory.
//!
//! Endpoints of the external services and polling/TTL knobs. Every field
//! has a default, so a partial or missing file still yields usable settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

// ── Settings ───────────────────────────────────────────────────────

/// Client settings.
///
/// Persisted to `{data_dir}/settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// UI theme: `"system"`, `"light"`, or `"dark"`.
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Base URL of the vault backend.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Base URL of the k-anonymity password range service.
    #[serde(default = "default_range_api_url")]
    pub range_api_url: String,

    /// Base URL of the email breach-analytics service.
    #[serde(default = "default_breach_api_url")]
    pub breach_api_url: String,

    /// Base URL of the disposable mailbox provider.
    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,

    /// Seconds between inbox polls.
    #[serde(default = "default_inbox_poll_interval")]
    pub inbox_poll_interval_secs: u64,

    /// Hours a temporary mailbox session is reused before a new one is created.
    #[serde(default = "default_temp_email_ttl_hours")]
    pub temp_email_ttl_hours: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            backend_url: default_backend_url(),
            range_api_url: default_range_api_url(),
            breach_api_url: default_breach_api_url(),
            mail_api_url: default_mail_api_url(),
            inbox_poll_interval_secs: default_inbox_poll_interval(),
            temp_email_ttl_hours: default_temp_email_ttl_hours(),
        }
    }
}

fn default_theme() -> String {
    "system".into()
}
fn default_backend_url() -> String {
    "http://localhost:3000".into()
}
fn default_range_api_url() -> String {
    "https://api.pwnedpasswords.com".into()
}
fn default_breach_api_url() -> String {
    "https://api.xposedornot.com".into()
}
fn default_mail_api_url() -> String {
    "https://api.mail.tm".into()
}
const fn default_inbox_poll_interval() -> u64 {
    5
}
const fn default_temp_email_ttl_hours() -> u64 {
    156 // 6.5 days
}

// ── Keys accepted by `set` ─────────────────────────────────────────

/// Names accepted by [`Settings::set`], in display order.
pub const SETTING_KEYS: &[&str] = &[
    "theme",
    "backendUrl",
    "rangeApiUrl",
    "breachApiUrl",
    "mailApiUrl",
    "inboxPollIntervalSecs",
    "tempEmailTtlHours",
];

const THEMES: &[&str] = &["system", "light", "dark"];

impl Settings {
    /// Update one setting from its JSON key (e.g. `tempEmailTtlHours`) and a
    /// string value.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Validation`] for an unknown key, an unknown
    /// theme, or a non-positive integer where one is required.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), VaultError> {
        match key {
            "theme" => {
                if !THEMES.contains(&value) {
                    return Err(VaultError::Validation(format!(
                        "unknown theme '{value}'. Expected one of: system, light, dark."
                    )));
                }
                value.clone_into(&mut self.theme);
            }
            "backendUrl" => set_url(&mut self.backend_url, value),
            "rangeApiUrl" => set_url(&mut self.range_api_url, value),
            "breachApiUrl" => set_url(&mut self.breach_api_url, value),
            "mailApiUrl" => set_url(&mut self.mail_api_url, value),
            "inboxPollIntervalSecs" => self.inbox_poll_interval_secs = parse_positive(key, value)?,
            "tempEmailTtlHours" => self.temp_email_ttl_hours = parse_positive(key, value)?,
            other => {
                return Err(VaultError::Validation(format!(
                    "unknown setting '{other}'. Expected one of: {}.",
                    SETTING_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Replace values `set` would have rejected with their defaults.
    ///
    /// Applied to everything read from disk, so a hand-edited file cannot
    /// produce a zero poll interval or a zero mailbox TTL.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !THEMES.contains(&self.theme.as_str()) {
            self.theme = default_theme();
        }
        if self.inbox_poll_interval_secs == 0 {
            self.inbox_poll_interval_secs = default_inbox_poll_interval();
        }
        if self.temp_email_ttl_hours == 0 {
            self.temp_email_ttl_hours = default_temp_email_ttl_hours();
        }
        self
    }

    /// Temporary mailbox TTL in milliseconds.
    #[must_use]
    pub const fn temp_email_ttl_ms(&self) -> u64 {
        self.temp_email_ttl_hours.saturating_mul(3_600_000)
    }
}

/// Base URLs are stored without a trailing slash.
fn set_url(field: &mut String, value: &str) {
    value.trim_end_matches('/').clone_into(field);
}

fn parse_positive(key: &str, value: &str) -> Result<u64, VaultError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(VaultError::Validation(format!(
            "{key} must be a positive integer, got '{value}'"
        ))),
    }
}

// ── File I/O ───────────────────────────────────────────────────────

const SETTINGS_FILE: &str = "settings.json";

impl Settings {
    /// Load settings from `{data_dir}/settings.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON (corrupt-file recovery). Out-of-range values
    /// fall back to their defaults, see [`Self::sanitized`].
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        fs::read_to_string(&path).map_or_else(
            |_| Self::default(),
            |contents| {
                serde_json::from_str::<Self>(&contents)
                    .unwrap_or_default()
                    .sanitized()
            },
        )
    }

    /// Persist settings to `{data_dir}/settings.json`.
    ///
    /// Writes to a `.tmp` file first, then renames over the target.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> Result<(), VaultError> {
        let path = data_dir.join(SETTINGS_FILE);
        let tmp = data_dir.join(".settings.json.tmp");

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_values_are_correct() {
        let s = Settings::default();
        assert_eq!(s.theme, "system");
        assert_eq!(s.range_api_url, "https://api.pwnedpasswords.com");
        assert_eq!(s.mail_api_url, "https://api.mail.tm");
        assert_eq!(s.inbox_poll_interval_secs, 5);
        assert_eq!(s.temp_email_ttl_hours, 156);
    }

    #[test]
    fn ttl_converts_to_millis() {
        // 6.5 days
        assert_eq!(Settings::default().temp_email_ttl_ms(), 561_600_000);
    }

    #[test]
    fn load_returns_default_on_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            theme: "dark".into(),
            inbox_poll_interval_secs: 10,
            ..Settings::default()
        };
        settings.save(dir.path()).unwrap();
        assert_eq!(Settings::load(dir.path()), settings);
        assert!(!dir.path().join(".settings.json.tmp").exists());
    }

    #[test]
    fn load_recovers_from_corrupt_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            "{ this is not valid json }}}",
        )
        .unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn load_handles_partial_json_with_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), r#"{"theme":"light"}"#).unwrap();
        let s = Settings::load(dir.path());
        assert_eq!(s.theme, "light");
        assert_eq!(s.inbox_poll_interval_secs, 5);
    }

    #[test]
    fn load_replaces_zero_intervals_with_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"inboxPollIntervalSecs":0,"tempEmailTtlHours":0,"theme":"neon"}"#,
        )
        .unwrap();
        let s = Settings::load(dir.path());
        assert_eq!(s.inbox_poll_interval_secs, 5);
        assert_eq!(s.temp_email_ttl_hours, 156);
        assert_eq!(s.theme, "system");
        assert_eq!(s.temp_email_ttl_ms(), 561_600_000);
    }

    #[test]
    fn sanitized_keeps_valid_values() {
        let s = Settings {
            theme: "dark".into(),
            inbox_poll_interval_secs: 1,
            temp_email_ttl_hours: 2,
            ..Settings::default()
        };
        assert_eq!(s.clone().sanitized(), s);
    }

    #[test]
    fn set_updates_known_keys() {
        let mut s = Settings::default();
        s.set("theme", "dark").unwrap();
        s.set("backendUrl", "https://vault.example.com/").unwrap();
        s.set("inboxPollIntervalSecs", "30").unwrap();
        assert_eq!(s.theme, "dark");
        assert_eq!(s.backend_url, "https://vault.example.com");
        assert_eq!(s.inbox_poll_interval_secs, 30);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut s = Settings::default();
        assert!(s.set("theme", "neon").is_err());
        assert!(s.set("inboxPollIntervalSecs", "0").is_err());
        assert!(s.set("tempEmailTtlHours", "soon").is_err());
        let err = s.set("colour", "red").unwrap_err().to_string();
        assert!(err.contains("unknown setting"));
        assert_eq!(s, Settings::default());
    }
}
