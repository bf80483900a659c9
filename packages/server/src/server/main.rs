// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use greenhouse_client::GreenhouseClient;
use skillseekr_core::{
    domains::discovery::{FileDiscoveryCache, StaticCandidateSource},
    domains::jobs::{PostgresJobStore, SkillExtractor},
    kernel::{GreenhouseAdapter, ServerDeps},
    server::{build_app, AppState},
    Config,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,skillseekr_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SkillSeekr API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Board API client
    let client = GreenhouseClient::with_bases(&config.board.api_base, &config.board.page_base)
        .context("Failed to build board API client")?;

    // Candidate universe: file if configured, otherwise the curated list
    let candidates = StaticCandidateSource::load(config.board.candidates_file.as_deref()).await?;

    let deps = ServerDeps::new(
        Arc::new(GreenhouseAdapter::new(Arc::new(client))),
        Arc::new(candidates),
        Arc::new(FileDiscoveryCache::new(&config.discovery.cache_path)),
        Arc::new(PostgresJobStore::new(pool)),
        SkillExtractor::builtin(),
    );

    let state = AppState::new(
        &deps,
        &config.discovery,
        &config.ingestion,
        config.scheduler.clone(),
    );

    // Start scheduled discovery
    if config.scheduler.enabled {
        state
            .scheduler
            .start()
            .await
            .context("Failed to start discovery scheduler")?;
    } else {
        tracing::info!("Discovery scheduler disabled");
    }

    let scheduler = state.scheduler.clone();
    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    scheduler.stop().await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
