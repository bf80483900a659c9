//! Discovery engine
//!
//! Probes every candidate in input order, one at a time, with a fixed delay
//! between probes. Failed probes are recorded and never abort the run.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::probe::probe_board;
use crate::common::utils::rounded_seconds;
use crate::config::DiscoveryConfig;
use crate::domains::discovery::candidates::normalize_candidates;
use crate::domains::discovery::models::{DiscoveryResult, DiscoverySnapshot};
use crate::kernel::{BaseBoardClient, Pacer};

/// Reported after every probe.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryProgress<'a> {
    /// 1-based index of the probe just finished.
    pub current: usize,
    pub total: usize,
    /// Valid boards found so far.
    pub found: usize,
    pub latest: &'a DiscoveryResult,
}

#[derive(Clone)]
pub struct DiscoveryEngine {
    board: Arc<dyn BaseBoardClient>,
    probe_delay: Duration,
    probe_timeout: Duration,
}

impl DiscoveryEngine {
    pub fn new(board: Arc<dyn BaseBoardClient>, config: &DiscoveryConfig) -> Self {
        Self {
            board,
            probe_delay: config.probe_delay,
            probe_timeout: config.probe_timeout,
        }
    }

    pub async fn discover(&self, candidates: &[String]) -> DiscoverySnapshot {
        self.discover_with_progress(candidates, |progress| {
            debug!(
                current = progress.current,
                total = progress.total,
                found = progress.found,
                token = %progress.latest.token,
                "Discovery progress"
            );
        })
        .await
    }

    /// Probe every candidate and rank the valid boards by job count.
    ///
    /// Candidates are normalised and deduplicated first, so each board is
    /// probed once. Ties keep input order.
    pub async fn discover_with_progress<F>(&self, candidates: &[String], mut on_progress: F) -> DiscoverySnapshot
    where
        F: FnMut(DiscoveryProgress<'_>) + Send,
    {
        let tokens = normalize_candidates(candidates);
        let total = tokens.len();
        info!(total, delay_ms = self.probe_delay.as_millis() as u64, "Starting discovery");

        let started = Instant::now();
        let pacer = Pacer::new(self.probe_delay);
        let mut companies = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            pacer.ready().await;
            let result = probe_board(self.board.as_ref(), token, self.probe_timeout).await;

            if result.valid {
                info!(token = %token, job_count = result.job_count, "Found board");
                companies.push(result.clone());
            }

            on_progress(DiscoveryProgress {
                current: index + 1,
                total,
                found: companies.len(),
                latest: &result,
            });
        }

        companies.sort_by(|a, b| b.job_count.cmp(&a.job_count));

        let snapshot = DiscoverySnapshot {
            discovered_at: Utc::now(),
            total_checked: total,
            valid_count: companies.len(),
            duration_seconds: rounded_seconds(started.elapsed()),
            companies,
        };

        info!(
            total_checked = snapshot.total_checked,
            valid_count = snapshot.valid_count,
            duration_secs = snapshot.duration_seconds,
            "Discovery complete"
        );

        snapshot
    }
}
