#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Mailbox session and settings persistence through the data directory.

use privguard_vault::{
    JsonFileStore, KvStore, SessionCache, Settings, TempMailSession, DEFAULT_SESSION_TTL_MS,
};
use tempfile::TempDir;

const CREATED_AT: u64 = 1_700_000_000_000;

fn session() -> TempMailSession {
    TempMailSession {
        address: "k3x9q0ab@example.test".into(),
        token: "bearer-token".into(),
        created_at_ms: CREATED_AT,
    }
}

#[test]
fn session_survives_reopen_within_ttl() {
    let dir = TempDir::new().unwrap();
    let mut cache = SessionCache::new(JsonFileStore::open(dir.path()), DEFAULT_SESSION_TTL_MS);
    cache.save(&session()).unwrap();
    drop(cache);

    let mut cache = SessionCache::new(JsonFileStore::open(dir.path()), DEFAULT_SESSION_TTL_MS);
    let one_day = 24 * 60 * 60 * 1000;
    assert_eq!(cache.load(CREATED_AT + one_day).unwrap(), Some(session()));
}

#[test]
fn session_expires_after_six_and_a_half_days() {
    let dir = TempDir::new().unwrap();
    let mut cache = SessionCache::new(JsonFileStore::open(dir.path()), DEFAULT_SESSION_TTL_MS);
    cache.save(&session()).unwrap();

    let ttl = 6 * 24 * 60 * 60 * 1000 + 12 * 60 * 60 * 1000;
    assert_eq!(ttl, DEFAULT_SESSION_TTL_MS);
    assert!(cache.load(CREATED_AT + ttl - 1).unwrap().is_some());
    assert_eq!(cache.load(CREATED_AT + ttl).unwrap(), None);
    drop(cache);

    // The expired session is gone from disk, deadline key included.
    let store = JsonFileStore::open(dir.path());
    assert_eq!(store.get("tempAuthToken").unwrap(), None);
    assert_eq!(store.get("tempAuthToken.expiresAt").unwrap(), None);
    assert_eq!(store.get("tempEmail").unwrap(), None);
}

#[test]
fn settings_ttl_drives_session_cache() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.set("tempEmailTtlHours", "1").unwrap();
    settings.save(dir.path()).unwrap();

    let loaded = Settings::load(dir.path());
    let mut cache = SessionCache::new(JsonFileStore::open(dir.path()), loaded.temp_email_ttl_ms());
    cache.save(&session()).unwrap();
    assert!(cache.load(CREATED_AT + 3_599_999).unwrap().is_some());
    assert_eq!(cache.load(CREATED_AT + 3_600_000).unwrap(), None);
}

#[test]
fn zero_values_in_settings_file_keep_sessions_usable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"inboxPollIntervalSecs":0,"tempEmailTtlHours":0}"#,
    )
    .unwrap();

    let loaded = Settings::load(dir.path());
    assert_eq!(loaded.inbox_poll_interval_secs, 5);
    assert_eq!(loaded.temp_email_ttl_hours, 156);

    let mut cache = SessionCache::new(JsonFileStore::open(dir.path()), loaded.temp_email_ttl_ms());
    cache.save(&session()).unwrap();
    assert_eq!(cache.load(CREATED_AT).unwrap(), Some(session()));
}

#[test]
fn cleared_session_leaves_other_keys() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(dir.path());
    store.set("theme", "dark").unwrap();

    let mut cache = SessionCache::new(store, DEFAULT_SESSION_TTL_MS);
    cache.save(&session()).unwrap();
    cache.clear().unwrap();
    drop(cache);

    let store = JsonFileStore::open(dir.path());
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(store.get("tempEmail").unwrap(), None);
}
