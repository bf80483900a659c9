//! List a company board and fetch every posting's detail.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::common::{PipelineError, PipelineResult};
use crate::config::MAX_DETAIL_FETCH_CONCURRENCY;
use crate::domains::jobs::models::FetchedJob;
use crate::kernel::BaseBoardClient;

#[derive(Clone)]
pub struct JobFetcher {
    board: Arc<dyn BaseBoardClient>,
    concurrency: usize,
}

impl JobFetcher {
    /// `concurrency` bounds in-flight detail requests per company (clamped to 1..=32).
    pub fn new(board: Arc<dyn BaseBoardClient>, concurrency: usize) -> Self {
        Self {
            board,
            concurrency: concurrency.clamp(1, MAX_DETAIL_FETCH_CONCURRENCY),
        }
    }

    /// All postings on `token`'s board with their details.
    ///
    /// A failed list call fails the whole company. A failed detail call drops
    /// only that posting. `title_filter` keeps postings whose title contains it,
    /// case-insensitively.
    pub async fn list_and_fetch(
        &self,
        token: &str,
        title_filter: Option<&str>,
    ) -> PipelineResult<Vec<FetchedJob>> {
        let listed = self
            .board
            .list_jobs(token)
            .await
            .map_err(|source| PipelineError::ListFetch {
                company: token.to_string(),
                source,
            })?;

        let listed_count = listed.len();
        let listed: Vec<_> = match title_filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(filter) => {
                let filter = filter.to_lowercase();
                listed
                    .into_iter()
                    .filter(|job| job.title.to_lowercase().contains(&filter))
                    .collect()
            }
            None => listed,
        };

        debug!(
            token = %token,
            listed = listed_count,
            matched = listed.len(),
            concurrency = self.concurrency,
            "Fetching job details"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let fetches = listed.into_iter().map(|summary| {
            let semaphore = semaphore.clone();
            async move {
                let _permit = semaphore.acquire().await.ok()?;
                match self.board.job_detail(token, summary.id).await {
                    Ok(detail) => Some(FetchedJob::from_board(token, summary, detail)),
                    Err(e) => {
                        warn!(token = %token, job_id = summary.id, error = %e, "Failed to fetch job detail");
                        None
                    }
                }
            }
        });

        let jobs: Vec<FetchedJob> = join_all(fetches).await.into_iter().flatten().collect();

        info!(
            token = %token,
            listed = listed_count,
            fetched = jobs.len(),
            "Fetched jobs with details"
        );

        Ok(jobs)
    }
}
