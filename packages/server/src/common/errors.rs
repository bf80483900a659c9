use greenhouse_client::GreenhouseError;
use thiserror::Error;

/// Errors surfaced to callers of the discovery and ingestion operations.
///
/// Unit-of-work failures (one probe, one job detail, one upsert) never appear
/// here; they are recorded in result objects and logged.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{operation} already running")]
    Conflict { operation: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Board API failed for {company}: {source}")]
    ListFetch {
        company: String,
        #[source]
        source: GreenhouseError,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, PipelineError::Conflict { .. })
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
