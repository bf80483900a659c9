//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{DiscoveryConfig, IngestionConfig, SchedulerConfig};
use crate::domains::discovery::{DiscoveryEngine, DiscoveryService};
use crate::domains::jobs::{IngestionCoordinator, JobFetcher};
use crate::kernel::{DiscoveryScheduler, ServerDeps};
use crate::server::routes::{
    company_status_handler, company_tokens_handler, health_handler, ingest_company_handler,
    ingestion_stats_handler, list_companies_handler, refresh_companies_handler,
    run_ingestion_handler, skills_by_company_handler, top_skills_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryService>,
    pub scheduler: Arc<DiscoveryScheduler>,
    pub ingestion: Arc<IngestionCoordinator>,
}

impl AppState {
    /// Wire the discovery and ingestion pipelines onto shared dependencies
    pub fn new(
        deps: &ServerDeps,
        discovery: &DiscoveryConfig,
        ingestion: &IngestionConfig,
        scheduler: SchedulerConfig,
    ) -> Self {
        let engine = DiscoveryEngine::new(deps.board.clone(), discovery);
        let discovery_service = Arc::new(DiscoveryService::new(
            engine,
            deps.candidates.clone(),
            deps.discovery_cache.clone(),
            discovery.max_age_hours,
        ));

        let fetcher = JobFetcher::new(deps.board.clone(), ingestion.detail_concurrency);
        let coordinator = Arc::new(IngestionCoordinator::new(
            fetcher,
            deps.skills.clone(),
            deps.job_store.clone(),
            ingestion.company_delay,
        ));

        Self {
            scheduler: Arc::new(DiscoveryScheduler::new(discovery_service.clone(), scheduler)),
            discovery: discovery_service,
            ingestion: coordinator,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - allow any origin, the API is read-mostly and unauthenticated
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        // Discovery
        .route("/companies", get(list_companies_handler))
        .route("/companies/tokens", get(company_tokens_handler))
        .route("/companies/status", get(company_status_handler))
        .route("/companies/refresh", post(refresh_companies_handler))
        // Ingestion
        .route("/ingestion/run", post(run_ingestion_handler))
        .route("/ingestion/company/:token", post(ingest_company_handler))
        .route("/ingestion/stats", get(ingestion_stats_handler))
        .route("/ingestion/skills", get(top_skills_handler))
        .route(
            "/ingestion/skills/by-company/:company",
            get(skills_by_company_handler),
        )
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
