//! Email breach-analytics response model and the summary derived from it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

const NOT_FOUND_MARKER: &str = "Not found";
const MAX_RISK_SCORE: i64 = 100;

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

/// Analytics for one email address. Missing sections decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachResponse {
    #[serde(rename = "BreachMetrics", default)]
    pub metrics: BreachMetrics,
    #[serde(rename = "BreachesSummary", default)]
    pub summary: BreachesSummary,
    #[serde(rename = "ExposedBreaches", default)]
    pub exposed: ExposedBreaches,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachMetrics {
    #[serde(default)]
    pub risk: Vec<RiskMetric>,
    /// Counts keyed `y<year>`, e.g. `"y2020": 1`.
    #[serde(default)]
    pub yearwise_details: Vec<BTreeMap<String, u64>>,
    #[serde(default)]
    pub passwords_strength: Vec<PasswordStorage>,
    #[serde(default)]
    pub xposed_data: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetric {
    #[serde(default)]
    pub risk_label: String,
    #[serde(default)]
    pub risk_score: i64,
}

/// How breached sites stored the leaked passwords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStorage {
    #[serde(rename = "EasyToCrack", default)]
    pub easy_to_crack: u64,
    #[serde(rename = "PlainText", default)]
    pub plain_text: u64,
    #[serde(rename = "StrongHash", default)]
    pub strong_hash: u64,
    #[serde(rename = "Unknown", default)]
    pub unknown: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachesSummary {
    /// Semicolon-separated breach names.
    #[serde(default)]
    pub site: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedBreaches {
    #[serde(default)]
    pub breaches_details: Vec<BreachDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreachDetails {
    pub breach: String,
    pub details: String,
    pub domain: String,
    pub industry: String,
    pub logo: String,
    pub password_risk: String,
    pub references: String,
    pub searchable: String,
    pub verified: String,
    /// Semicolon-separated categories, e.g. `"Email addresses;Passwords"`.
    pub xposed_data: String,
    pub xposed_date: String,
    pub xposed_records: u64,
}

impl BreachDetails {
    /// Exposed data categories of this breach.
    pub fn exposed_categories(&self) -> impl Iterator<Item = &str> {
        split_list(&self.xposed_data)
    }
}

/// Decode a breach-analytics body.
///
/// Returns `Ok(None)` when the service reports the address as unknown
/// (`{"Error": "Not found"}`).
///
/// # Errors
///
/// Returns [`VaultError::Serialization`] if the body is not valid JSON
/// or does not match the response shape.
pub fn parse_breach_response(body: &str) -> Result<Option<BreachResponse>, VaultError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("Error").and_then(serde_json::Value::as_str) == Some(NOT_FOUND_MARKER) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

// ---------------------------------------------------------------------------
// Risk level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl RiskLevel {
    /// Parse a service risk label. Unrecognized labels map to `Unknown`.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: u16,
    pub count: u64,
}

/// Figures shown to the user for one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachSummary {
    pub breach_count: usize,
    pub sites: Vec<String>,
    pub total_exposed_records: u64,
    pub risk_level: RiskLevel,
    /// Service risk score clamped to 0..=100.
    pub risk_score: u8,
    /// Years with at least one breach, ascending.
    pub timeline: Vec<YearCount>,
    /// Distinct exposed data categories across all breaches, first-seen order.
    pub exposed_data: Vec<String>,
    pub password_storage: PasswordStorage,
}

/// Derive the user-facing summary from a decoded response.
#[must_use]
pub fn summarize(response: &BreachResponse) -> BreachSummary {
    let breaches = &response.exposed.breaches_details;
    let risk = response.metrics.risk.first();

    let mut exposed_data: Vec<String> = Vec::new();
    for category in breaches.iter().flat_map(BreachDetails::exposed_categories) {
        if !exposed_data.iter().any(|c| c == category) {
            exposed_data.push(category.to_owned());
        }
    }

    BreachSummary {
        breach_count: breaches.len(),
        sites: split_list(&response.summary.site)
            .map(str::to_owned)
            .collect(),
        total_exposed_records: breaches
            .iter()
            .fold(0u64, |acc, b| acc.saturating_add(b.xposed_records)),
        risk_level: risk.map_or(RiskLevel::Unknown, |r| RiskLevel::parse(&r.risk_label)),
        risk_score: risk.map_or(0, |r| clamp_risk_score(r.risk_score)),
        timeline: timeline(&response.metrics),
        exposed_data,
        password_storage: response
            .metrics
            .passwords_strength
            .first()
            .copied()
            .unwrap_or_default(),
    }
}

/// Clamp a service risk score to 0..=100.
#[must_use]
pub fn clamp_risk_score(score: i64) -> u8 {
    u8::try_from(score.clamp(0, MAX_RISK_SCORE))
        .unwrap_or(u8::MAX)
}

/// Years with a non-zero count, ascending. Keys that are not `y<year>` are skipped.
#[must_use]
pub fn timeline(metrics: &BreachMetrics) -> Vec<YearCount> {
    let mut by_year: BTreeMap<u16, u64> = BTreeMap::new();
    for (key, &count) in metrics.yearwise_details.iter().flatten() {
        let Some(year) = key.strip_prefix('y').and_then(|y| y.parse::<u16>().ok()) else {
            continue;
        };
        if count > 0 {
            let slot = by_year.entry(year).or_insert(0);
            *slot = slot.saturating_add(count);
        }
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
