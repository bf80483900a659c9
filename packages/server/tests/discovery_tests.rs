//! Discovery pipeline tests: probing, ranking, caching and single-flight.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use common::{discovery_service, fast_discovery_config, snapshot_aged, wait_until};
use skillseekr_core::common::PipelineError;
use skillseekr_core::config::DiscoveryConfig;
use skillseekr_core::domains::discovery::{CheckOutcome, DiscoveryEngine};
use skillseekr_core::kernel::{
    BaseDiscoveryCache, MemoryDiscoveryCache, MockBoardClient, TestDependencies,
};

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

// =============================================================================
// DiscoveryEngine
// =============================================================================

#[tokio::test]
async fn discovery_ranks_valid_boards_by_job_count() {
    let board = Arc::new(
        MockBoardClient::new()
            .with_job_count("small", 1)
            .with_job_count("big", 12)
            .with_job_count("empty", 0)
            .with_job_count("medium", 5),
    );
    let engine = DiscoveryEngine::new(board, &fast_discovery_config());

    let snapshot = engine
        .discover(&tokens(&["small", "missing", "big", "empty", "medium"]))
        .await;

    assert_eq!(snapshot.total_checked, 5);
    assert_eq!(snapshot.valid_count, 4);
    assert_eq!(snapshot.tokens(), vec!["big", "medium", "small", "empty"]);
    assert!(snapshot
        .companies
        .windows(2)
        .all(|pair| pair[0].job_count >= pair[1].job_count));
}

#[tokio::test]
async fn discovery_keeps_input_order_for_equal_counts() {
    let board = Arc::new(
        MockBoardClient::new()
            .with_job_count("charlie", 3)
            .with_job_count("alpha", 3)
            .with_job_count("bravo", 3),
    );
    let engine = DiscoveryEngine::new(board, &fast_discovery_config());

    let snapshot = engine.discover(&tokens(&["charlie", "alpha", "bravo"])).await;

    assert_eq!(snapshot.tokens(), vec!["charlie", "alpha", "bravo"]);
}

#[tokio::test]
async fn discovery_probes_each_normalized_candidate_once() {
    let board = Arc::new(MockBoardClient::new().with_job_count("stripe", 2));
    let engine = DiscoveryEngine::new(board.clone(), &fast_discovery_config());

    let snapshot = engine
        .discover(&tokens(&["Stripe", " stripe ", "", "STRIPE", "figma"]))
        .await;

    assert_eq!(board.list_calls(), vec!["stripe", "figma"]);
    assert_eq!(snapshot.total_checked, 2);
    assert_eq!(snapshot.valid_count, 1);
}

#[tokio::test]
async fn discovery_continues_past_failed_probes() {
    let board = Arc::new(
        MockBoardClient::new()
            .with_error("broken", 503, "unavailable")
            .with_job_count("works", 4),
    );
    let engine = DiscoveryEngine::new(board, &fast_discovery_config());

    let mut seen = Vec::new();
    let snapshot = engine
        .discover_with_progress(&tokens(&["missing", "broken", "works"]), |p| {
            seen.push((p.current, p.total, p.found, p.latest.clone()));
        })
        .await;

    assert_eq!(snapshot.tokens(), vec!["works"]);
    assert_eq!(seen.len(), 3);

    let (_, total, found, missing) = &seen[0];
    assert_eq!((*total, *found), (3, 0));
    assert!(!missing.valid);
    assert_eq!(missing.error.as_deref(), Some("Not found"));

    let broken = &seen[1].3;
    assert!(!broken.valid);
    assert!(broken.error.as_deref().unwrap_or_default().contains("503"));

    let (current, _, found, works) = &seen[2];
    assert_eq!((*current, *found), (3, 1));
    assert!(works.valid);
    assert_eq!(works.job_count, 4);
    assert_eq!(works.board_url, "https://boards.greenhouse.io/works");
    assert_eq!(works.api_url, "https://boards-api.greenhouse.io/v1/boards/works/jobs");
}

#[tokio::test]
async fn slow_probe_times_out_and_is_marked_invalid() {
    let board = Arc::new(
        MockBoardClient::new()
            .with_job_count("slow", 1)
            .with_list_delay(Duration::from_millis(200)),
    );
    let config = DiscoveryConfig {
        probe_delay: Duration::ZERO,
        probe_timeout: Duration::from_millis(20),
        ..DiscoveryConfig::default()
    };
    let engine = DiscoveryEngine::new(board, &config);

    let mut latest = None;
    let snapshot = engine
        .discover_with_progress(&tokens(&["slow"]), |p| latest = Some(p.latest.clone()))
        .await;

    assert_eq!(snapshot.valid_count, 0);
    let latest = latest.unwrap();
    assert!(!latest.valid);
    assert_eq!(latest.error.as_deref(), Some("timeout of 20ms exceeded"));
}

#[tokio::test]
async fn discovery_paces_probes() {
    let board = Arc::new(
        MockBoardClient::new()
            .with_job_count("a", 1)
            .with_job_count("b", 1)
            .with_job_count("c", 1),
    );
    let config = DiscoveryConfig {
        probe_delay: Duration::from_millis(50),
        ..DiscoveryConfig::default()
    };
    let engine = DiscoveryEngine::new(board, &config);

    let started = std::time::Instant::now();
    engine.discover(&tokens(&["a", "b", "c"])).await;

    // First probe goes out immediately, the next two wait one period each
    assert!(started.elapsed() >= Duration::from_millis(90));
}

// =============================================================================
// DiscoveryService
// =============================================================================

#[tokio::test]
async fn fresh_cache_is_served_without_probing() {
    let deps = TestDependencies::new()
        .with_board(MockBoardClient::new().with_job_count("stripe", 3))
        .with_candidates(&["stripe"])
        .with_discovery_cache(MemoryDiscoveryCache::new().with_snapshot(snapshot_aged(2, &[("cached", 9)])));
    let service = discovery_service(&deps);

    let snapshot = service.get_discovered_companies(false).await.unwrap();

    assert_eq!(snapshot.tokens(), vec!["cached"]);
    assert!(deps.board.list_calls().is_empty());
    assert_eq!(deps.discovery_cache.save_count(), 0);
}

#[tokio::test]
async fn stale_cache_triggers_rediscovery() {
    let deps = TestDependencies::new()
        .with_board(MockBoardClient::new().with_job_count("stripe", 3))
        .with_candidates(&["stripe"])
        .with_discovery_cache(MemoryDiscoveryCache::new().with_snapshot(snapshot_aged(25, &[("cached", 9)])));
    let service = discovery_service(&deps);

    let tokens = service.get_company_tokens().await.unwrap();

    assert_eq!(tokens, vec!["stripe"]);
    assert_eq!(deps.discovery_cache.save_count(), 1);
    assert_eq!(deps.discovery_cache.current().unwrap().tokens(), vec!["stripe"]);
}

#[tokio::test]
async fn force_refresh_ignores_fresh_cache() {
    let deps = TestDependencies::new()
        .with_board(MockBoardClient::new().with_job_count("stripe", 3))
        .with_candidates(&["stripe"])
        .with_discovery_cache(MemoryDiscoveryCache::new().with_snapshot(snapshot_aged(0, &[("cached", 9)])));
    let service = discovery_service(&deps);

    let snapshot = service.get_discovered_companies(true).await.unwrap();

    assert_eq!(snapshot.tokens(), vec!["stripe"]);
    assert_eq!(deps.board.list_calls(), vec!["stripe"]);
}

#[tokio::test]
async fn check_and_run_reports_each_outcome() {
    let deps = TestDependencies::new()
        .with_board(MockBoardClient::new().with_job_count("stripe", 3))
        .with_candidates(&["stripe", "missing"]);
    let service = discovery_service(&deps);

    let first = service.check_and_run().await;
    assert_eq!(
        first,
        CheckOutcome::Completed {
            valid_count: 1,
            total_checked: 2
        }
    );

    let second = service.check_and_run().await;
    assert!(matches!(second, CheckOutcome::Fresh { age_hours } if age_hours < 1.0));
    assert_eq!(deps.board.list_calls().len(), 2);
}

#[tokio::test]
async fn failed_save_leaves_cache_stale_for_next_check() {
    let deps = TestDependencies::new()
        .with_board(MockBoardClient::new().with_job_count("stripe", 3))
        .with_candidates(&["stripe"]);
    let service = discovery_service(&deps);

    deps.discovery_cache.set_fail_saves(true);
    let failed = service.check_and_run().await;
    assert!(matches!(failed, CheckOutcome::Failed(ref e) if e.contains("disk full")));
    assert!(!service.is_running());
    assert!(deps.discovery_cache.current().is_none());

    deps.discovery_cache.set_fail_saves(false);
    let retried = service.check_and_run().await;
    assert!(matches!(retried, CheckOutcome::Completed { valid_count: 1, .. }));
    assert!(deps.discovery_cache.load().await.unwrap().is_some());
}

#[tokio::test]
async fn concurrent_runs_are_single_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let deps = TestDependencies::new()
        .with_board(
            MockBoardClient::new()
                .with_job_count("stripe", 3)
                .with_list_gate(gate.clone()),
        )
        .with_candidates(&["stripe"]);
    let service = discovery_service(&deps);

    let running = {
        let service = service.clone();
        tokio::spawn(async move { service.run_now().await })
    };
    assert!(wait_until(|| deps.board.list_calls().len() == 1).await);
    assert!(service.is_running());

    // Manual trigger conflicts, scheduled check skips
    let conflict = service.run_now().await.unwrap_err();
    assert!(matches!(conflict, PipelineError::Conflict { .. }));
    assert_eq!(service.check_and_run().await, CheckOutcome::AlreadyRunning);

    // Nothing cached yet, so a read during the run surfaces the conflict too
    assert!(service
        .get_discovered_companies(true)
        .await
        .unwrap_err()
        .is_conflict());

    gate.add_permits(1);
    let snapshot = running.await.unwrap().unwrap();

    assert_eq!(snapshot.tokens(), vec!["stripe"]);
    assert_eq!(deps.board.list_calls(), vec!["stripe"]);
    assert_eq!(deps.discovery_cache.save_count(), 1);
    assert!(!service.is_running());
}

#[tokio::test]
async fn read_during_run_serves_stale_snapshot() {
    let gate = Arc::new(Semaphore::new(0));
    let deps = TestDependencies::new()
        .with_board(
            MockBoardClient::new()
                .with_job_count("stripe", 3)
                .with_list_gate(gate.clone()),
        )
        .with_candidates(&["stripe"])
        .with_discovery_cache(MemoryDiscoveryCache::new().with_snapshot(snapshot_aged(30, &[("old", 1)])));
    let service = discovery_service(&deps);

    service.start_run_now().unwrap();
    assert!(wait_until(|| deps.board.list_calls().len() == 1).await);

    let served = service.get_discovered_companies(false).await.unwrap();
    assert_eq!(served.tokens(), vec!["old"]);

    gate.add_permits(1);
    assert!(wait_until(|| !service.is_running()).await);
    assert_eq!(deps.discovery_cache.current().unwrap().tokens(), vec!["stripe"]);
}

#[tokio::test]
async fn status_reads_cache_without_running_discovery() {
    let deps = TestDependencies::new()
        .with_board(MockBoardClient::new().with_job_count("stripe", 3))
        .with_candidates(&["stripe"]);
    let service = discovery_service(&deps);

    assert_eq!(service.max_age_hours(), 24);

    let empty = service.status().await;
    assert!(!empty.is_running);
    assert!(empty.last_discovery.is_none());
    assert!(empty.cache_age_hours.is_none());
    assert_eq!(empty.companies_found, 0);
    assert!(deps.board.list_calls().is_empty());

    service.run_now().await.unwrap();
    let status = service.status().await;
    assert_eq!(status.companies_found, 1);
    assert_eq!(status.total_checked, 1);
    assert_eq!(status.cache_age_hours, Some(0));
}
