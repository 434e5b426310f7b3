//! Password health analysis over the vault listing.
//!
//! Strength is recomputed from each password with the canonical scorer
//! rather than trusting the score stored at write time, so entries saved
//! by older clients are judged by the same rules as new ones.
//! The report carries only entry references and aggregate numbers.

use std::collections::HashMap;

use serde::Serialize;

use crate::entries::VaultEntry;
use privguard_core::strength::{self, StrengthLabel};

/// A credential reference (ID + service name), no secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRef {
    pub id: String,
    pub service: String,
}

/// A group of credentials sharing the same password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusedGroup {
    pub credentials: Vec<CredentialRef>,
}

/// A credential whose password scores below Strong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakCredential {
    pub id: String,
    pub service: String,
    pub score: u8,
    pub label: StrengthLabel,
}

/// Complete password health analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordHealthReport {
    /// Overall vault health score (0–100).
    pub overall_score: u32,
    pub total_credentials: u32,
    /// Mean canonical strength score, 0.0 for an empty vault.
    pub average_strength: f64,

    /// Credentials sharing duplicate passwords.
    pub reused_count: u32,
    pub reused_groups: Vec<ReusedGroup>,

    /// Credentials with weak or moderate passwords.
    pub weak_count: u32,
    pub weak_credentials: Vec<WeakCredential>,
}

/// Analyze password health for every entry in `entries`.
#[must_use]
#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
pub fn analyze_password_health(entries: &[VaultEntry]) -> PasswordHealthReport {
    let total_credentials = entries.len() as u32;

    if total_credentials == 0 {
        return PasswordHealthReport {
            overall_score: 100,
            total_credentials: 0,
            average_strength: 0.0,
            reused_count: 0,
            reused_groups: Vec::new(),
            weak_count: 0,
            weak_credentials: Vec::new(),
        };
    }

    let mut password_hashes: Vec<([u8; 32], &VaultEntry)> = Vec::with_capacity(entries.len());
    let mut weak_credentials: Vec<WeakCredential> = Vec::new();
    let mut score_sum: u64 = 0;

    for entry in entries {
        // --- Reused detection: BLAKE3 hash ---
        let hash: [u8; 32] = blake3::hash(entry.password.as_bytes()).into();
        password_hashes.push((hash, entry));

        // --- Weak detection ---
        let assessment = strength::assess(&entry.password);
        score_sum += u64::from(assessment.score);
        if assessment.label != StrengthLabel::Strong {
            weak_credentials.push(WeakCredential {
                id: entry.id.clone(),
                service: entry.service.clone(),
                score: assessment.score,
                label: assessment.label,
            });
        }
    }

    let reused_groups = find_reused_groups(&password_hashes);
    let reused_count: u32 = reused_groups
        .iter()
        .map(|g| g.credentials.len() as u32)
        .sum();
    let weak_count = weak_credentials.len() as u32;

    let total_issues = reused_count + weak_count;
    let total_checks = total_credentials * 2;
    let overall_score = 100u32.saturating_sub((total_issues * 100) / total_checks);

    PasswordHealthReport {
        overall_score,
        total_credentials,
        average_strength: score_sum as f64 / f64::from(total_credentials),
        reused_count,
        reused_groups,
        weak_count,
        weak_credentials,
    }
}

/// Group password hashes into reused groups (only groups with 2+ members),
/// in order of first appearance.
fn find_reused_groups(hashes: &[([u8; 32], &VaultEntry)]) -> Vec<ReusedGroup> {
    let mut order: Vec<[u8; 32]> = Vec::new();
    let mut groups: HashMap<[u8; 32], Vec<CredentialRef>> = HashMap::new();

    for (hash, entry) in hashes {
        let members = groups.entry(*hash).or_insert_with(|| {
            order.push(*hash);
            Vec::new()
        });
        members.push(CredentialRef {
            id: entry.id.clone(),
            service: entry.service.clone(),
        });
    }

    order
        .into_iter()
        .filter_map(|hash| groups.remove(&hash))
        .filter(|g| g.len() >= 2)
        .map(|credentials| ReusedGroup { credentials })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
