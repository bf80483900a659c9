//! Job model
//!
//! One row per external posting, keyed by `source_id`. Rows are created on the
//! first sighting and updated in place on every later one.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::domains::jobs::skills::ExperienceLevel;

/// Default `source` for postings from the board API.
pub const GREENHOUSE_SOURCE: &str = "greenhouse";

/// Stable identity of a posting: `{source}-{company_token}-{external_id}`.
pub fn source_id(source: &str, company_token: &str, external_id: u64) -> String {
    format!("{}-{}-{}", source, company_token, external_id)
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub source_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub description: String,
    /// Sorted, deduplicated canonical skills.
    pub skills: Vec<String>,
    pub department: Option<String>,
    pub employment_type: String,
    pub is_remote: bool,
    pub experience_level: String,
    pub source: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the ingestion path writes for one posting.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct UpsertJob {
    pub source_id: String,
    pub title: String,
    pub company: String,
    #[builder(default = "Unknown".to_string())]
    pub location: String,
    #[builder(default)]
    pub url: String,
    #[builder(default)]
    pub description: String,
    #[builder(default)]
    pub skills: Vec<String>,
    #[builder(default)]
    pub department: Option<String>,
    #[builder(default = "full-time".to_string())]
    pub employment_type: String,
    #[builder(default)]
    pub is_remote: bool,
    #[builder(default = ExperienceLevel::Unknown)]
    pub experience_level: ExperienceLevel,
    #[builder(default = GREENHOUSE_SOURCE.to_string())]
    pub source: String,
    #[builder(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Aggregate counts over the job table.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub companies_count: i64,
    pub last_ingested_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: i64,
}

/// Filter for the top-skills aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillQuery {
    pub limit: i64,
    pub experience_level: Option<ExperienceLevel>,
    /// Case-insensitive substring of the company name.
    pub company: Option<String>,
}

impl SkillQuery {
    pub const DEFAULT_LIMIT: i64 = 20;

    pub fn top(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

impl Default for SkillQuery {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            experience_level: None,
            company: None,
        }
    }
}

impl Job {
    /// Find a job by its source identity
    pub async fn find_by_source_id(source_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM jobs WHERE source_id = $1")
            .bind(source_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert or update by `source_id`.
    ///
    /// Every sighting refreshes content, `fetched_at`, `last_seen_at` and
    /// reactivates the row. `first_seen_at` keeps its insert value.
    pub async fn upsert(job: &UpsertJob, seen_at: DateTime<Utc>, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO jobs (
                source_id, title, company, location, url, description, skills,
                department, employment_type, is_remote, experience_level, source,
                posted_at, fetched_at, first_seen_at, last_seen_at, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14, $14, TRUE)
            ON CONFLICT (source_id) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                url = EXCLUDED.url,
                description = EXCLUDED.description,
                skills = EXCLUDED.skills,
                department = EXCLUDED.department,
                employment_type = EXCLUDED.employment_type,
                is_remote = EXCLUDED.is_remote,
                experience_level = EXCLUDED.experience_level,
                source = EXCLUDED.source,
                posted_at = EXCLUDED.posted_at,
                fetched_at = EXCLUDED.fetched_at,
                last_seen_at = EXCLUDED.last_seen_at,
                is_active = TRUE,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&job.source_id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.url)
        .bind(&job.description)
        .bind(&job.skills)
        .bind(&job.department)
        .bind(&job.employment_type)
        .bind(job.is_remote)
        .bind(job.experience_level.to_string())
        .bind(&job.source)
        .bind(job.posted_at)
        .bind(seen_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Totals, active count, distinct companies and latest fetch time
    pub async fn stats(pool: &PgPool) -> Result<JobStats> {
        sqlx::query_as::<_, JobStats>(
            r#"
            SELECT
                COUNT(*) AS total_jobs,
                COUNT(*) FILTER (WHERE is_active) AS active_jobs,
                COUNT(DISTINCT company) AS companies_count,
                MAX(fetched_at) AS last_ingested_at
            FROM jobs
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Skill frequencies, most common first
    pub async fn top_skills(query: &SkillQuery, pool: &PgPool) -> Result<Vec<SkillCount>> {
        sqlx::query_as::<_, SkillCount>(
            r#"
            SELECT skill, COUNT(*) AS count
            FROM jobs, UNNEST(skills) AS skill
            WHERE ($2::TEXT IS NULL OR experience_level = $2)
              AND ($3::TEXT IS NULL OR POSITION(LOWER($3) IN LOWER(company)) > 0)
            GROUP BY skill
            ORDER BY count DESC, skill ASC
            LIMIT $1
            "#,
        )
        .bind(query.limit)
        .bind(query.experience_level.map(|level| level.to_string()))
        .bind(query.company.as_deref())
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
