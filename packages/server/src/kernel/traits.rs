// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Probing, ranking, classification and ingestion are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseBoardClient, BaseJobStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use greenhouse_client::{BoardJobDetail, BoardJobSummary, GreenhouseError};

use crate::domains::discovery::models::DiscoverySnapshot;
use crate::domains::jobs::models::{Job, JobStats, SkillCount, SkillQuery, UpsertJob};

// =============================================================================
// Board Client Trait (Infrastructure - external job-board API)
// =============================================================================

#[async_trait]
pub trait BaseBoardClient: Send + Sync {
    /// List every published job on a company board.
    /// A missing board is `GreenhouseError::NotFound`.
    async fn list_jobs(&self, token: &str) -> Result<Vec<BoardJobSummary>, GreenhouseError>;

    /// Fetch one job with its HTML content and metadata.
    async fn job_detail(&self, token: &str, job_id: u64) -> Result<BoardJobDetail, GreenhouseError>;

    /// Public board page for a company
    fn board_url(&self, token: &str) -> String;

    /// Job-list endpoint for a company
    fn jobs_url(&self, token: &str) -> String;
}

// =============================================================================
// Candidate Source Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseCandidateSource: Send + Sync {
    /// Candidate board tokens, already normalised and deduplicated.
    async fn candidates(&self) -> Result<Vec<String>>;
}

// =============================================================================
// Discovery Cache Trait (Infrastructure)
// =============================================================================

/// True when there is no snapshot or it is older than `max_age`.
pub fn is_stale(snapshot: Option<&DiscoverySnapshot>, max_age: Duration, now: DateTime<Utc>) -> bool {
    match snapshot {
        None => true,
        Some(snapshot) => now - snapshot.discovered_at > max_age,
    }
}

#[async_trait]
pub trait BaseDiscoveryCache: Send + Sync {
    /// Load the last saved snapshot. `Ok(None)` on a cold start.
    async fn load(&self) -> Result<Option<DiscoverySnapshot>>;

    /// Replace the stored snapshot. Readers never observe a partial write.
    async fn save(&self, snapshot: &DiscoverySnapshot) -> Result<()>;

    fn is_stale(&self, snapshot: Option<&DiscoverySnapshot>, max_age_hours: i64) -> bool {
        is_stale(snapshot, Duration::hours(max_age_hours), Utc::now())
    }
}

// =============================================================================
// Job Store Trait (Infrastructure - upsert store with aggregations)
// =============================================================================

#[async_trait]
pub trait BaseJobStore: Send + Sync {
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<Job>>;

    /// Insert or update keyed by `source_id`.
    /// Marks the record active and seen at `seen_at`; `first_seen_at` is only set on insert.
    async fn upsert(&self, job: &UpsertJob, seen_at: DateTime<Utc>) -> Result<Job>;

    async fn stats(&self) -> Result<JobStats>;

    /// Most frequent skills across stored jobs, ties broken alphabetically.
    async fn top_skills(&self, query: &SkillQuery) -> Result<Vec<SkillCount>>;
}
