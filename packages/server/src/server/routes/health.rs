use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    discovery_running: bool,
    ingestion_running: bool,
    scheduler_started: bool,
}

/// Health check endpoint
///
/// Always 200 while the process serves requests. Reports whether the
/// pipelines are mid-run and whether background discovery is scheduled.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        discovery_running: state.discovery.is_running(),
        ingestion_running: state.ingestion.is_running(),
        scheduler_started: state.scheduler.is_started().await,
    })
}
