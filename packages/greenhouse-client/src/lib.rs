//! Pure Greenhouse job board REST API client.
//!
//! Read-only access to the public per-company board API: list a board's jobs
//! and fetch a single job's detail.
//!
//! # Example
//!
//! ```rust,ignore
//! use greenhouse_client::GreenhouseClient;
//!
//! let client = GreenhouseClient::new()?;
//!
//! let jobs = client.list_jobs("stripe").await?;
//! let detail = client.job_detail("stripe", jobs[0].id).await?;
//! println!("{}", detail.absolute_url.unwrap_or_default());
//! ```

pub mod error;
pub mod types;

pub use error::{GreenhouseError, Result};
pub use types::{BoardJobDetail, BoardJobSummary, JobListResponse, MetadataField, NamedRef};

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_BASE: &str = "https://boards-api.greenhouse.io/v1/boards";
pub const DEFAULT_BOARD_BASE: &str = "https://boards.greenhouse.io";

/// Request timeout for list and detail calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GreenhouseClient {
    client: reqwest::Client,
    api_base: String,
    board_base: String,
}

impl GreenhouseClient {
    pub fn new() -> Result<Self> {
        Self::with_bases(DEFAULT_API_BASE, DEFAULT_BOARD_BASE)
    }

    /// Point the client at a different API host (staging, local fixtures).
    pub fn with_bases(api_base: impl Into<String>, board_base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("skillseekr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            board_base: board_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Public board page for a company.
    pub fn board_url(&self, token: &str) -> String {
        format!("{}/{}", self.board_base, token)
    }

    /// Job-list endpoint for a company.
    pub fn jobs_url(&self, token: &str) -> String {
        format!("{}/{}/jobs", self.api_base, token)
    }

    fn job_url(&self, token: &str, job_id: u64) -> String {
        format!("{}/{}/jobs/{}", self.api_base, token, job_id)
    }

    /// List all published jobs on a board. An empty board is `Ok(vec![])`.
    pub async fn list_jobs(&self, token: &str) -> Result<Vec<BoardJobSummary>> {
        let url = self.jobs_url(token);
        let body: JobListResponse = self.get_json(token, &url).await?;
        tracing::debug!(token, count = body.jobs.len(), "Listed board jobs");
        Ok(body.jobs)
    }

    /// Fetch one job including its HTML content, metadata, departments and offices.
    pub async fn job_detail(&self, token: &str, job_id: u64) -> Result<BoardJobDetail> {
        let url = self.job_url(token, job_id);
        self.get_json(token, &url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, url: &str) -> Result<T> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GreenhouseError::NotFound {
                token: token.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GreenhouseError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
