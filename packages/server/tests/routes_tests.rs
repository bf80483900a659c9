//! HTTP route tests driven through the axum router.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::Semaphore;
use tower::ServiceExt;

use common::{app_state, snapshot_aged, wait_until};
use skillseekr_core::kernel::{MemoryDiscoveryCache, MockBoardClient, MockJob, TestDependencies};
use skillseekr_core::server::build_app;

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn cached_deps() -> TestDependencies {
    TestDependencies::new()
        .with_board(
            MockBoardClient::new()
                .with_jobs(
                    "acme",
                    vec![MockJob::new(1, "Senior Rust Engineer").with_content("Rust, Kubernetes")],
                )
                .with_job_count("globex", 2),
        )
        .with_candidates(&["acme", "globex"])
        .with_discovery_cache(
            MemoryDiscoveryCache::new().with_snapshot(snapshot_aged(1, &[("globex", 2), ("acme", 1)])),
        )
}

#[tokio::test]
async fn health_reports_pipeline_state() {
    let deps = TestDependencies::new();
    let app = build_app(app_state(&deps));

    let (status, body) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["discoveryRunning"], false);
    assert_eq!(body["ingestionRunning"], false);
}

#[tokio::test]
async fn companies_endpoints_serve_cached_snapshot() {
    let deps = cached_deps();
    let app = build_app(app_state(&deps));

    let (status, body) = send(&app, "GET", "/companies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["totalCompanies"], 2);
    assert_eq!(body["companies"][0]["token"], "globex");
    assert_eq!(body["companies"][0]["jobCount"], 2);
    assert!(body["companies"][0].get("error").is_none());

    let (_, body) = send(&app, "GET", "/companies/tokens").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["tokens"], serde_json::json!(["globex", "acme"]));

    let (_, body) = send(&app, "GET", "/companies/status").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["isRunning"], false);
    assert_eq!(body["cacheAgeHours"], 1);
    assert_eq!(body["companiesFound"], 2);

    assert!(deps.board.list_calls().is_empty());
}

#[tokio::test]
async fn refresh_conflicts_while_discovery_runs() {
    let gate = Arc::new(Semaphore::new(0));
    let deps = TestDependencies::new()
        .with_board(
            MockBoardClient::new()
                .with_job_count("acme", 1)
                .with_list_gate(gate.clone()),
        )
        .with_candidates(&["acme"]);
    let state = app_state(&deps);
    let discovery = state.discovery.clone();
    let app = build_app(state);

    let (status, body) = send(&app, "POST", "/companies/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Discovery started in background");

    let (status, body) = send(&app, "POST", "/companies/refresh").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Discovery already running");

    gate.add_permits(1);
    assert!(wait_until(|| !discovery.is_running()).await);
    assert_eq!(deps.discovery_cache.save_count(), 1);
}

#[tokio::test]
async fn ingestion_endpoints_round_trip() {
    let deps = cached_deps();
    let state = app_state(&deps);
    let ingestion = state.ingestion.clone();
    let app = build_app(state);

    let (status, body) = send(&app, "POST", "/ingestion/company/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["company"], "acme");
    assert_eq!(body["saved"], 1);

    let (status, body) = send(&app, "POST", "/ingestion/run").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ingestion started for 2 companies");
    assert!(body["runId"].is_string());
    assert!(wait_until(|| !ingestion.is_running()).await);

    let (_, body) = send(&app, "GET", "/ingestion/stats").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["totalJobs"], 3);
    assert_eq!(body["companiesCount"], 2);

    let (_, body) = send(&app, "GET", "/ingestion/skills?limit=5&level=senior").await;
    assert_eq!(body["totalSkills"], 2);
    assert_eq!(body["skills"][0]["skill"], "kubernetes");
    assert_eq!(body["skills"][1]["skill"], "rust");
    assert_eq!(body["categories"]["languages"], serde_json::json!(["rust"]));
    assert_eq!(body["categories"]["cloudDevops"], serde_json::json!(["kubernetes"]));
    assert_eq!(body["categories"]["frontend"], serde_json::json!([]));

    let (_, body) = send(&app, "GET", "/ingestion/skills/by-company/ACM").await;
    assert_eq!(body["company"], "ACM");
    assert_eq!(body["skills"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn bad_input_maps_to_client_errors() {
    let deps = cached_deps();
    let app = build_app(app_state(&deps));

    let (status, body) = send(&app, "GET", "/ingestion/skills?level=wizard").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/ingestion/skills?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/ingestion/company/%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_company_reports_error_in_body() {
    let deps = TestDependencies::new()
        .with_board(MockBoardClient::new().with_error("acme", 502, "bad gateway"));
    let app = build_app(app_state(&deps));

    let (status, body) = send(&app, "POST", "/ingestion/company/acme").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["total"], 0);
    assert!(body["error"].as_str().unwrap_or_default().contains("acme"));
}
