use axum::{
    extract::{Extension, Query},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::PipelineResult;
use crate::domains::discovery::{DiscoveryResult, DiscoveryStatus};
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CompaniesQuery {
    /// Run discovery even if the cache is fresh
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompaniesResponse {
    success: bool,
    discovered_at: DateTime<Utc>,
    total_companies: usize,
    companies: Vec<DiscoveryResult>,
}

#[derive(Serialize)]
pub struct TokensResponse {
    success: bool,
    count: usize,
    tokens: Vec<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    success: bool,
    #[serde(flatten)]
    status: DiscoveryStatus,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// GET /companies - the discovered boards, running discovery when the cache is stale
pub async fn list_companies_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<CompaniesQuery>,
) -> PipelineResult<Json<CompaniesResponse>> {
    let snapshot = state
        .discovery
        .get_discovered_companies(query.refresh)
        .await?;

    Ok(Json(CompaniesResponse {
        success: true,
        discovered_at: snapshot.discovered_at,
        total_companies: snapshot.valid_count,
        companies: snapshot.companies,
    }))
}

/// GET /companies/tokens
pub async fn company_tokens_handler(
    Extension(state): Extension<AppState>,
) -> PipelineResult<Json<TokensResponse>> {
    let tokens = state.discovery.get_company_tokens().await?;

    Ok(Json(TokensResponse {
        success: true,
        count: tokens.len(),
        tokens,
    }))
}

/// GET /companies/status - cache state only, never starts discovery
pub async fn company_status_handler(Extension(state): Extension<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        status: state.discovery.status().await,
    })
}

/// POST /companies/refresh - start discovery in the background
pub async fn refresh_companies_handler(
    Extension(state): Extension<AppState>,
) -> PipelineResult<Json<MessageResponse>> {
    state.discovery.start_run_now()?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Discovery started in background".to_string(),
    }))
}
