//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Keeps the discovery cache fresh without external timer infrastructure:
//!
//! ```text
//! Startup (+10s, once) ──┐
//!                        ├─► DiscoveryService::check_and_run()
//! Every hour ────────────┘       ├─ pass in flight → skip
//!                                ├─ cache fresh    → skip
//!                                └─ otherwise      → discover + save
//! ```
//!
//! A failed run leaves the cache stale, so the next tick retries.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::common::PipelineResult;
use crate::config::SchedulerConfig;
use crate::domains::discovery::{CheckOutcome, DiscoveryService, DiscoverySnapshot};

pub struct DiscoveryScheduler {
    service: Arc<DiscoveryService>,
    config: SchedulerConfig,
    jobs: Mutex<Option<JobScheduler>>,
}

impl DiscoveryScheduler {
    pub fn new(service: Arc<DiscoveryService>, config: SchedulerConfig) -> Self {
        Self {
            service,
            config,
            jobs: Mutex::new(None),
        }
    }

    /// Register the startup check and the periodic check. Starting twice is a no-op.
    pub async fn start(&self) -> Result<()> {
        let mut jobs = self.jobs.lock().await;
        if jobs.is_some() {
            return Ok(());
        }

        let scheduler = JobScheduler::new().await?;

        let startup_service = self.service.clone();
        let startup_job = Job::new_one_shot_async(self.config.startup_delay, move |_uuid, _lock| {
            let service = startup_service.clone();
            Box::pin(async move {
                log_outcome(service.check_and_run().await);
            })
        })?;
        scheduler.add(startup_job).await?;

        let tick_service = self.service.clone();
        let tick_job = Job::new_repeated_async(self.config.check_interval, move |_uuid, _lock| {
            let service = tick_service.clone();
            Box::pin(async move {
                log_outcome(service.check_and_run().await);
            })
        })?;
        scheduler.add(tick_job).await?;

        scheduler.start().await?;
        *jobs = Some(scheduler);

        tracing::info!(
            startup_delay_secs = self.config.startup_delay.as_secs(),
            check_interval_secs = self.config.check_interval.as_secs(),
            max_age_hours = self.service.max_age_hours(),
            "Discovery scheduler started"
        );
        Ok(())
    }

    /// Cancel pending checks. A pass already in flight runs to completion.
    pub async fn stop(&self) -> Result<()> {
        if let Some(mut scheduler) = self.jobs.lock().await.take() {
            scheduler.shutdown().await?;
            tracing::info!("Discovery scheduler stopped");
        }
        Ok(())
    }

    pub async fn is_started(&self) -> bool {
        self.jobs.lock().await.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.service.is_running()
    }

    /// Manual trigger. Fails with `Conflict` while a pass is in flight.
    pub async fn run_now(&self) -> PipelineResult<DiscoverySnapshot> {
        self.service.run_now().await
    }
}

fn log_outcome(outcome: CheckOutcome) {
    match outcome {
        CheckOutcome::Completed {
            valid_count,
            total_checked,
        } => tracing::info!(valid_count, total_checked, "Scheduled discovery complete"),
        CheckOutcome::Failed(error) => {
            tracing::error!(error = %error, "Scheduled discovery failed, will retry next tick")
        }
        CheckOutcome::AlreadyRunning | CheckOutcome::Fresh { .. } => {}
    }
}
