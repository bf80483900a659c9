//! Discovery operations exposed to the scheduler and the route layer.
//!
//! At most one discovery pass runs at a time. Scheduled checks skip while a
//! pass is in flight; manual triggers fail with `Conflict`.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::activities::DiscoveryEngine;
use super::models::{DiscoverySnapshot, DiscoveryStatus};
use crate::common::{PipelineError, PipelineResult};
use crate::kernel::{BaseCandidateSource, BaseDiscoveryCache, RunGuard, RunPermit};

const OPERATION: &str = "Discovery";

/// What a scheduled discovery check did.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// A pass was already in flight.
    AlreadyRunning,
    /// The cached snapshot is fresh enough.
    Fresh { age_hours: f64 },
    Completed { valid_count: usize, total_checked: usize },
    Failed(String),
}

pub struct DiscoveryService {
    engine: DiscoveryEngine,
    candidates: Arc<dyn BaseCandidateSource>,
    cache: Arc<dyn BaseDiscoveryCache>,
    guard: RunGuard,
    max_age_hours: i64,
}

impl DiscoveryService {
    pub fn new(
        engine: DiscoveryEngine,
        candidates: Arc<dyn BaseCandidateSource>,
        cache: Arc<dyn BaseDiscoveryCache>,
        max_age_hours: i64,
    ) -> Self {
        Self {
            engine,
            candidates,
            cache,
            guard: RunGuard::new(),
            max_age_hours,
        }
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Snapshots older than this are rediscovered.
    pub fn max_age_hours(&self) -> i64 {
        self.max_age_hours
    }

    /// Run discovery if the cache is missing or stale and no pass is in flight.
    /// Failures are logged and reported in the outcome, never returned.
    pub async fn check_and_run(&self) -> CheckOutcome {
        if self.is_running() {
            info!("Discovery already running, skipping check");
            return CheckOutcome::AlreadyRunning;
        }

        let cached = self.load_cached().await;
        if !self.cache.is_stale(cached.as_ref(), self.max_age_hours) {
            if let Some(snapshot) = &cached {
                let age_hours = snapshot.age_hours(Utc::now());
                info!(age_hours = age_hours.round() as i64, "Discovery cache is fresh, skipping");
                return CheckOutcome::Fresh { age_hours };
            }
        }

        let permit = match self.guard.try_acquire(OPERATION) {
            Ok(permit) => permit,
            Err(_) => return CheckOutcome::AlreadyRunning,
        };

        info!("Starting scheduled discovery");
        match self.run_locked(&permit).await {
            Ok(snapshot) => CheckOutcome::Completed {
                valid_count: snapshot.valid_count,
                total_checked: snapshot.total_checked,
            },
            Err(e) => {
                error!(error = %e, "Scheduled discovery failed");
                CheckOutcome::Failed(e.to_string())
            }
        }
    }

    /// Run discovery now, failing with `Conflict` if a pass is in flight.
    pub async fn run_now(&self) -> PipelineResult<DiscoverySnapshot> {
        let permit = self.guard.try_acquire(OPERATION)?;
        self.run_locked(&permit).await
    }

    /// `run_now` on a background task. The guard is taken before returning.
    pub fn start_run_now(self: &Arc<Self>) -> PipelineResult<()> {
        let permit = self.guard.try_acquire(OPERATION)?;
        let service = Arc::clone(self);

        tokio::spawn(async move {
            if let Err(e) = service.run_locked(&permit).await {
                error!(error = %e, "Background discovery failed");
            }
        });

        Ok(())
    }

    /// The cached snapshot, or a fresh one when the cache is missing, stale
    /// or `force_refresh` is set.
    ///
    /// If a pass is already in flight, any cached snapshot is returned instead;
    /// with nothing cached the `Conflict` is returned.
    pub async fn get_discovered_companies(&self, force_refresh: bool) -> PipelineResult<DiscoverySnapshot> {
        let cached = self.load_cached().await;

        if !force_refresh && !self.cache.is_stale(cached.as_ref(), self.max_age_hours) {
            if let Some(snapshot) = cached {
                return Ok(snapshot);
            }
        }

        info!(force_refresh, "Discovery cache stale or missing, running discovery");
        match self.run_now().await {
            Err(PipelineError::Conflict { operation }) => match cached {
                Some(snapshot) => {
                    warn!("Discovery in progress, serving cached snapshot");
                    Ok(snapshot)
                }
                None => Err(PipelineError::Conflict { operation }),
            },
            other => other,
        }
    }

    /// Valid board tokens, highest job count first.
    pub async fn get_company_tokens(&self) -> PipelineResult<Vec<String>> {
        Ok(self.get_discovered_companies(false).await?.tokens())
    }

    /// Current state from the cache alone. Never triggers discovery.
    pub async fn status(&self) -> DiscoveryStatus {
        let cached = self.load_cached().await;
        let now = Utc::now();

        DiscoveryStatus {
            is_running: self.is_running(),
            last_discovery: cached.as_ref().map(|s| s.discovered_at),
            cache_age_hours: cached.as_ref().map(|s| s.age_hours(now).round() as i64),
            companies_found: cached.as_ref().map(|s| s.valid_count).unwrap_or(0),
            total_checked: cached.as_ref().map(|s| s.total_checked).unwrap_or(0),
        }
    }

    async fn run_locked(&self, _permit: &RunPermit) -> PipelineResult<DiscoverySnapshot> {
        let candidates = self.candidates.candidates().await?;
        let snapshot = self.engine.discover(&candidates).await;
        self.cache.save(&snapshot).await?;
        Ok(snapshot)
    }

    /// Cache read errors count as a cold start.
    async fn load_cached(&self) -> Option<DiscoverySnapshot> {
        match self.cache.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to load discovery cache");
                None
            }
        }
    }
}
