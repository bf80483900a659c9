//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

use skillseekr_core::config::{DiscoveryConfig, IngestionConfig, SchedulerConfig};
use skillseekr_core::domains::discovery::{
    DiscoveryEngine, DiscoveryResult, DiscoveryService, DiscoverySnapshot,
};
use skillseekr_core::domains::jobs::{IngestionCoordinator, JobFetcher, SkillExtractor};
use skillseekr_core::kernel::TestDependencies;
use skillseekr_core::server::AppState;

/// Discovery settings without pacing, so tests run at full speed.
pub fn fast_discovery_config() -> DiscoveryConfig {
    DiscoveryConfig {
        probe_delay: Duration::ZERO,
        ..DiscoveryConfig::default()
    }
}

pub fn fast_ingestion_config() -> IngestionConfig {
    IngestionConfig {
        company_delay: Duration::ZERO,
        ..IngestionConfig::default()
    }
}

pub fn discovery_service(deps: &TestDependencies) -> Arc<DiscoveryService> {
    let config = fast_discovery_config();
    Arc::new(DiscoveryService::new(
        DiscoveryEngine::new(deps.board.clone(), &config),
        deps.candidates.clone(),
        deps.discovery_cache.clone(),
        config.max_age_hours,
    ))
}

pub fn ingestion_coordinator(deps: &TestDependencies, concurrency: usize) -> Arc<IngestionCoordinator> {
    Arc::new(IngestionCoordinator::new(
        JobFetcher::new(deps.board.clone(), concurrency),
        SkillExtractor::builtin(),
        deps.job_store.clone(),
        Duration::ZERO,
    ))
}

pub fn app_state(deps: &TestDependencies) -> AppState {
    AppState::new(
        &deps.into_server_deps(),
        &fast_discovery_config(),
        &fast_ingestion_config(),
        SchedulerConfig::default(),
    )
}

/// A snapshot taken `age_hours` ago listing `tokens` as valid boards.
pub fn snapshot_aged(age_hours: i64, tokens: &[(&str, usize)]) -> DiscoverySnapshot {
    let companies: Vec<DiscoveryResult> = tokens
        .iter()
        .map(|(token, count)| {
            DiscoveryResult::found(
                token,
                *count,
                format!("https://boards.greenhouse.io/{}", token),
                format!("https://boards-api.greenhouse.io/v1/boards/{}/jobs", token),
            )
        })
        .collect();

    DiscoverySnapshot {
        discovered_at: Utc::now() - ChronoDuration::hours(age_hours),
        total_checked: companies.len(),
        valid_count: companies.len(),
        duration_seconds: 1,
        companies,
    }
}

/// Wait until `condition` holds, polling every 10ms for up to two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
