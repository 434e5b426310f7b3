#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for password health over backend-shaped entry lists.

use privguard_core::{generate_password, StrengthLabel};
use privguard_vault::{analyze_password_health, group_by_domain, filter_entries, VaultEntry};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn entry(id: usize, domain: &str, password: String) -> VaultEntry {
    VaultEntry {
        id: id.to_string(),
        service: format!("Service {id}"),
        domain: domain.to_owned(),
        logo: None,
        notes: None,
        password,
        strength: 0,
    }
}

const BACKEND_LISTING: &str = r#"[
    {"id":"1","service":"GitHub","domain":"github.com","password":"Tr0ub4dor&3","strength":90},
    {"id":"2","service":"Google","domain":"google.com","password":"password","strength":35,"notes":"old"},
    {"id":"3","service":"Gmail","domain":"google.com","password":"Tr0ub4dor&3","strength":90,
     "logo":"https://logo.clearbit.com/google.com"}
]"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn generated_passwords_make_a_healthy_vault() {
    let entries: Vec<VaultEntry> = (0..20)
        .map(|i| entry(i, "example.com", generate_password()))
        .collect();
    let report = analyze_password_health(&entries);

    assert_eq!(report.total_credentials, 20);
    assert_eq!(report.weak_count, 0);
    assert_eq!(report.reused_count, 0);
    assert_eq!(report.overall_score, 100);
    assert!((report.average_strength - 100.0).abs() < f64::EPSILON);
}

#[test]
fn backend_listing_report() {
    let entries: Vec<VaultEntry> = serde_json::from_str(BACKEND_LISTING).unwrap();
    let report = analyze_password_health(&entries);

    assert_eq!(report.total_credentials, 3);
    assert_eq!(report.weak_count, 1);
    assert_eq!(report.weak_credentials[0].id, "2");
    assert_eq!(report.weak_credentials[0].label, StrengthLabel::Weak);
    assert_eq!(report.reused_count, 2);
    // 3 issues over 6 checks.
    assert_eq!(report.overall_score, 50);
}

#[test]
fn backend_listing_groups_and_filters() {
    let entries: Vec<VaultEntry> = serde_json::from_str(BACKEND_LISTING).unwrap();

    let groups = group_by_domain(&filter_entries(&entries, ""));
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].domain, "github.com");
    assert!(!groups[0].is_group());
    assert!(groups[1].is_group());

    let mail = filter_entries(&entries, "gmail");
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0].id, "3");
}

proptest! {
    #[test]
    fn overall_score_is_bounded(passwords in prop::collection::vec("[a-zA-Z0-9!@#]{0,20}", 0..12)) {
        let entries: Vec<VaultEntry> = passwords
            .into_iter()
            .enumerate()
            .map(|(i, p)| entry(i, "example.com", p))
            .collect();
        let report = analyze_password_health(&entries);

        prop_assert!(report.overall_score <= 100);
        prop_assert!(report.weak_count <= report.total_credentials);
        prop_assert!(report.reused_count <= report.total_credentials);
        prop_assert!(report.reused_groups.iter().all(|g| g.credentials.len() >= 2));
        prop_assert!(report.average_strength <= 100.0);
    }
}
