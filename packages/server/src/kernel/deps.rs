//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by the
//! discovery and ingestion pipelines. All external services sit behind trait
//! abstractions so tests can swap in mocks.

use async_trait::async_trait;
use greenhouse_client::{BoardJobDetail, BoardJobSummary, GreenhouseClient, GreenhouseError};
use std::sync::Arc;

use crate::domains::jobs::skills::SkillExtractor;
use crate::kernel::{BaseBoardClient, BaseCandidateSource, BaseDiscoveryCache, BaseJobStore};

// =============================================================================
// GreenhouseClient Adapter (implements BaseBoardClient trait)
// =============================================================================

/// Wrapper around GreenhouseClient that implements BaseBoardClient trait
pub struct GreenhouseAdapter(pub Arc<GreenhouseClient>);

impl GreenhouseAdapter {
    pub fn new(client: Arc<GreenhouseClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseBoardClient for GreenhouseAdapter {
    async fn list_jobs(&self, token: &str) -> Result<Vec<BoardJobSummary>, GreenhouseError> {
        self.0.list_jobs(token).await
    }

    async fn job_detail(&self, token: &str, job_id: u64) -> Result<BoardJobDetail, GreenhouseError> {
        self.0.job_detail(token, job_id).await
    }

    fn board_url(&self, token: &str) -> String {
        self.0.board_url(token)
    }

    fn jobs_url(&self, token: &str) -> String {
        self.0.jobs_url(token)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies shared by the pipelines (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub board: Arc<dyn BaseBoardClient>,
    pub candidates: Arc<dyn BaseCandidateSource>,
    pub discovery_cache: Arc<dyn BaseDiscoveryCache>,
    pub job_store: Arc<dyn BaseJobStore>,
    /// Skill classifier (built-in vocabulary unless replaced)
    pub skills: SkillExtractor,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        board: Arc<dyn BaseBoardClient>,
        candidates: Arc<dyn BaseCandidateSource>,
        discovery_cache: Arc<dyn BaseDiscoveryCache>,
        job_store: Arc<dyn BaseJobStore>,
        skills: SkillExtractor,
    ) -> Self {
        Self {
            board,
            candidates,
            discovery_cache,
            job_store,
            skills,
        }
    }
}
