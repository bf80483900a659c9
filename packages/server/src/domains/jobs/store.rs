use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{Job, JobStats, SkillCount, SkillQuery, UpsertJob};
use crate::kernel::BaseJobStore;

/// `BaseJobStore` backed by the `jobs` table.
#[derive(Clone)]
pub struct PostgresJobStore {
    pool: PgPool,
}

impl PostgresJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseJobStore for PostgresJobStore {
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<Job>> {
        Job::find_by_source_id(source_id, &self.pool).await
    }

    async fn upsert(&self, job: &UpsertJob, seen_at: DateTime<Utc>) -> Result<Job> {
        Job::upsert(job, seen_at, &self.pool).await
    }

    async fn stats(&self) -> Result<JobStats> {
        Job::stats(&self.pool).await
    }

    async fn top_skills(&self, query: &SkillQuery) -> Result<Vec<SkillCount>> {
        Job::top_skills(query, &self.pool).await
    }
}
