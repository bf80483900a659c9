//! Operator CLI for board discovery
//!
//! Prints what the cache currently holds, forces a fresh discovery pass,
//! saves it and lists the largest boards. Needs no database.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use greenhouse_client::GreenhouseClient;
use skillseekr_core::config::{BoardConfig, DiscoveryConfig};
use skillseekr_core::domains::discovery::{
    DiscoveryEngine, DiscoveryService, FileDiscoveryCache, StaticCandidateSource,
};
use skillseekr_core::kernel::GreenhouseAdapter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "discover")]
#[command(about = "Probe candidate companies for public job boards and refresh the cache")]
struct Cli {
    /// Number of boards to list after the run
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Candidate file (one token per line), overrides CANDIDATES_FILE
    #[arg(long)]
    candidates: Option<PathBuf>,

    /// Cache file, overrides DISCOVERY_CACHE_PATH
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,skillseekr_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let board = BoardConfig::from_env();
    let mut discovery = DiscoveryConfig::from_env().context("Invalid discovery configuration")?;
    if let Some(cache) = cli.cache {
        discovery.cache_path = cache;
    }

    let client = GreenhouseClient::with_bases(&board.api_base, &board.page_base)
        .context("Failed to build board API client")?;
    let candidates_file = cli.candidates.or(board.candidates_file);
    let candidates = StaticCandidateSource::load(candidates_file.as_deref()).await?;
    let cache = FileDiscoveryCache::new(&discovery.cache_path);

    println!("Cache: {}", cache.path().display());
    println!("Candidates: {}", candidates.len());

    let service = DiscoveryService::new(
        DiscoveryEngine::new(Arc::new(GreenhouseAdapter::new(Arc::new(client))), &discovery),
        Arc::new(candidates),
        Arc::new(cache),
        discovery.max_age_hours,
    );

    let status = service.status().await;
    match (status.last_discovery, status.cache_age_hours) {
        (Some(at), Some(age)) => println!(
            "Existing cache: {} companies, discovered {} ({}h ago)",
            status.companies_found,
            at.to_rfc3339(),
            age
        ),
        _ => println!("No existing cache"),
    }

    println!("Running discovery...");
    let started = Utc::now();
    let snapshot = service.run_now().await.context("Discovery failed")?;

    println!(
        "✓ Found {} boards out of {} candidates in {}s (started {})",
        snapshot.valid_count,
        snapshot.total_checked,
        snapshot.duration_seconds,
        started.format("%H:%M:%S")
    );

    let shown = snapshot.companies.len().min(cli.top);
    if shown > 0 {
        println!("\nTop {} by open jobs:", shown);
        for (rank, company) in snapshot.companies.iter().take(shown).enumerate() {
            println!(
                "{:>3}. {:<28} {:>5} jobs  {}",
                rank + 1,
                company.token,
                company.job_count,
                company.board_url
            );
        }
    }

    Ok(())
}
