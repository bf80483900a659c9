//! Jobs domain actions
//!
//! - `fetch_jobs`: list a company board and fetch posting details (bounded fan-out)
//! - `ingest`: classify fetched postings and upsert them, per company and per batch

pub mod fetch_jobs;
pub mod ingest;

pub use fetch_jobs::JobFetcher;
pub use ingest::{IngestionCoordinator, IngestionResult, IngestionRunSummary};
