//! Discovery snapshot models
//!
//! The snapshot is persisted verbatim as the discovery cache file, so the
//! serialized field names are part of the on-disk format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of probing one candidate board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub token: String,
    pub valid: bool,
    pub job_count: usize,
    pub board_url: String,
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiscoveryResult {
    pub fn found(token: &str, job_count: usize, board_url: String, api_url: String) -> Self {
        Self {
            token: token.to_string(),
            valid: true,
            job_count,
            board_url,
            api_url,
            error: None,
        }
    }

    pub fn failed(token: &str, error: impl Into<String>, board_url: String, api_url: String) -> Self {
        Self {
            token: token.to_string(),
            valid: false,
            job_count: 0,
            board_url,
            api_url,
            error: Some(error.into()),
        }
    }
}

/// Result of one full discovery pass. Replaced wholesale on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverySnapshot {
    pub discovered_at: DateTime<Utc>,
    pub total_checked: usize,
    pub valid_count: usize,
    pub duration_seconds: u64,
    /// Valid boards only, sorted by `job_count` descending.
    pub companies: Vec<DiscoveryResult>,
}

impl DiscoverySnapshot {
    /// Board tokens in ranking order.
    pub fn tokens(&self) -> Vec<String> {
        self.companies.iter().map(|c| c.token.clone()).collect()
    }

    /// Hours elapsed since the snapshot was taken, as a fraction.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        (now - self.discovered_at).num_seconds() as f64 / 3600.0
    }
}

/// Read-only view of discovery state for operators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStatus {
    pub is_running: bool,
    pub last_discovery: Option<DateTime<Utc>>,
    /// Whole hours, rounded.
    pub cache_age_hours: Option<i64>,
    pub companies_found: usize,
    pub total_checked: usize,
}
