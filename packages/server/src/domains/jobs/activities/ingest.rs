//! Job ingestion: fetch each company's postings, classify them and upsert into the store.
//!
//! Ingestion is single-flight. A batch or single-company run holds the
//! coordinator's guard until it finishes; a second request gets `Conflict`.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::fetch_jobs::JobFetcher;
use crate::common::utils::rounded_seconds;
use crate::common::{PipelineError, PipelineResult};
use crate::domains::jobs::models::{FetchedJob, JobStats, SkillCount, SkillQuery, UpsertJob};
use crate::domains::jobs::skills::{SkillCategories, SkillExtractor};
use crate::kernel::{BaseJobStore, Pacer, RunGuard};

const OPERATION: &str = "Ingestion";

/// Outcome for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    pub company: String,
    pub total: usize,
    pub saved: usize,
    pub updated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestionResult {
    fn failed(company: &str, error: impl Into<String>) -> Self {
        Self {
            company: company.to_string(),
            total: 0,
            saved: 0,
            updated: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome for a batch of companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRunSummary {
    pub companies_processed: usize,
    pub total_jobs: usize,
    pub total_saved: usize,
    pub total_updated: usize,
    pub duration_seconds: u64,
    pub results: Vec<IngestionResult>,
}

impl IngestionRunSummary {
    fn from_results(results: Vec<IngestionResult>, elapsed: Duration) -> Self {
        Self {
            companies_processed: results.len(),
            total_jobs: results.iter().map(|r| r.total).sum(),
            total_saved: results.iter().map(|r| r.saved).sum(),
            total_updated: results.iter().map(|r| r.updated).sum(),
            duration_seconds: rounded_seconds(elapsed),
            results,
        }
    }

    pub fn failed_companies(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }
}

pub struct IngestionCoordinator {
    fetcher: JobFetcher,
    extractor: SkillExtractor,
    store: Arc<dyn BaseJobStore>,
    company_delay: Duration,
    guard: RunGuard,
}

impl IngestionCoordinator {
    pub fn new(
        fetcher: JobFetcher,
        extractor: SkillExtractor,
        store: Arc<dyn BaseJobStore>,
        company_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            company_delay,
            guard: RunGuard::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Ingest one company.
    ///
    /// An empty token is rejected before any I/O. Failures fetching the
    /// company's board are reported in the result, not returned as `Err`.
    pub async fn ingest_company(&self, token: &str) -> PipelineResult<IngestionResult> {
        let token = validate_token(token)?;
        let _permit = self.guard.try_acquire(OPERATION)?;
        Ok(self.ingest_one(&token).await)
    }

    /// Ingest companies one after another, paced by the inter-company delay.
    pub async fn ingest_all(&self, tokens: &[String]) -> PipelineResult<IngestionRunSummary> {
        let _permit = self.guard.try_acquire(OPERATION)?;
        Ok(self.run_batch(tokens).await)
    }

    /// Start `ingest_all` on a background task and return its run id.
    ///
    /// The guard is taken before returning, so a concurrent request fails
    /// with `Conflict` even if the task has not started yet.
    pub fn start_ingest_all(self: &Arc<Self>, tokens: Vec<String>) -> PipelineResult<Uuid> {
        let permit = self.guard.try_acquire(OPERATION)?;
        let run_id = Uuid::new_v4();
        let coordinator = Arc::clone(self);

        tokio::spawn(async move {
            let _permit = permit;
            let summary = coordinator.run_batch(&tokens).await;
            if summary.companies_processed > 0 && summary.failed_companies() == summary.companies_processed {
                error!(run_id = %run_id, companies = summary.companies_processed, "Background ingestion failed for every company");
            } else {
                info!(
                    run_id = %run_id,
                    total_jobs = summary.total_jobs,
                    total_saved = summary.total_saved,
                    failed_companies = summary.failed_companies(),
                    "Background ingestion finished"
                );
            }
        });

        Ok(run_id)
    }

    pub async fn stats(&self) -> PipelineResult<JobStats> {
        Ok(self.store.stats().await?)
    }

    pub async fn top_skills(&self, query: &SkillQuery) -> PipelineResult<Vec<SkillCount>> {
        if query.limit <= 0 {
            return Err(PipelineError::InvalidInput("limit must be positive".to_string()));
        }
        Ok(self.store.top_skills(query).await?)
    }

    /// Group aggregated skills by vocabulary category, keeping their order.
    pub fn categorize(&self, skills: &[SkillCount]) -> SkillCategories {
        let names: Vec<&str> = skills.iter().map(|s| s.skill.as_str()).collect();
        self.extractor.categorize(&names)
    }

    async fn run_batch(&self, tokens: &[String]) -> IngestionRunSummary {
        info!(companies = tokens.len(), "Starting ingestion");

        let started = Instant::now();
        let pacer = Pacer::new(self.company_delay);
        let mut results = Vec::with_capacity(tokens.len());

        for token in tokens {
            pacer.ready().await;
            results.push(self.ingest_one(token).await);
        }

        let summary = IngestionRunSummary::from_results(results, started.elapsed());
        info!(
            companies = summary.companies_processed,
            total_jobs = summary.total_jobs,
            total_saved = summary.total_saved,
            duration_secs = summary.duration_seconds,
            "Ingestion complete"
        );
        summary
    }

    async fn ingest_one(&self, token: &str) -> IngestionResult {
        let jobs = match self.fetcher.list_and_fetch(token, None).await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(token = %token, error = %e, "Company ingestion failed");
                return IngestionResult::failed(token, e.to_string());
            }
        };

        let mut saved = 0;
        let mut updated = 0;

        for job in &jobs {
            let record = self.build_record(job);

            let existed = match self.store.find_by_source_id(&record.source_id).await {
                Ok(existing) => existing.is_some(),
                Err(e) => {
                    warn!(source_id = %record.source_id, error = %e, "Job lookup failed, skipping");
                    continue;
                }
            };

            match self.store.upsert(&record, Utc::now()).await {
                Ok(_) if existed => updated += 1,
                Ok(_) => saved += 1,
                Err(e) => {
                    warn!(source_id = %record.source_id, error = %e, "Job upsert failed");
                }
            }
        }

        info!(token = %token, total = jobs.len(), saved, updated, "Company ingested");

        IngestionResult {
            company: token.to_string(),
            total: jobs.len(),
            saved,
            updated,
            error: None,
        }
    }

    fn build_record(&self, job: &FetchedJob) -> UpsertJob {
        UpsertJob::builder()
            .source_id(job.source_id.clone())
            .title(job.title.clone())
            .company(job.company.clone())
            .location(job.display_location())
            .url(job.url.clone())
            .description(job.description.clone())
            .skills(self.extractor.extract_skills(&job.description))
            .department(job.departments.first().cloned())
            .is_remote(job.is_remote)
            .experience_level(
                self.extractor
                    .detect_experience_level(&job.title, &job.description),
            )
            .posted_at(job.posted_at)
            .build()
    }
}

fn validate_token(token: &str) -> PipelineResult<String> {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return Err(PipelineError::InvalidInput(
            "company token is required".to_string(),
        ));
    }
    Ok(token)
}
