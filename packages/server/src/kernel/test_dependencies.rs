// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use greenhouse_client::{BoardJobDetail, BoardJobSummary, GreenhouseError, MetadataField, NamedRef};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::Semaphore;
use uuid::Uuid;

use super::{BaseBoardClient, BaseDiscoveryCache, BaseJobStore, ServerDeps};
use crate::domains::discovery::models::DiscoverySnapshot;
use crate::domains::discovery::StaticCandidateSource;
use crate::domains::jobs::models::{Job, JobStats, SkillCount, SkillQuery, UpsertJob};
use crate::domains::jobs::skills::SkillExtractor;

// =============================================================================
// Mock Board Client
// =============================================================================

/// A posting served by `MockBoardClient`.
#[derive(Debug, Clone)]
pub struct MockJob {
    pub id: u64,
    pub title: String,
    /// Entity-encoded HTML, as the real API returns it.
    pub content: String,
    pub location: Option<String>,
    pub remote: bool,
    pub departments: Vec<String>,
    pub fail_detail: bool,
}

impl MockJob {
    pub fn new(id: u64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            content: String::new(),
            location: None,
            remote: false,
            departments: Vec::new(),
            fail_detail: false,
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    pub fn with_department(mut self, department: &str) -> Self {
        self.departments.push(department.to_string());
        self
    }

    /// The detail call for this posting fails with a 500.
    pub fn failing_detail(mut self) -> Self {
        self.fail_detail = true;
        self
    }
}

#[derive(Debug, Clone)]
enum MockBoard {
    Jobs(Vec<MockJob>),
    Error { status: u16, message: String },
}

/// In-memory board API. Unknown tokens answer `NotFound`.
pub struct MockBoardClient {
    boards: Arc<Mutex<HashMap<String, MockBoard>>>,
    list_calls: Arc<Mutex<Vec<String>>>,
    detail_calls: Arc<Mutex<Vec<(String, u64)>>>,
    list_gate: Option<Arc<Semaphore>>,
    list_delay: Option<Duration>,
    detail_delay: Option<Duration>,
    details_in_flight: Arc<AtomicUsize>,
    max_details_in_flight: Arc<AtomicUsize>,
}

impl Default for MockBoardClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBoardClient {
    pub fn new() -> Self {
        Self {
            boards: Arc::new(Mutex::new(HashMap::new())),
            list_calls: Arc::new(Mutex::new(Vec::new())),
            detail_calls: Arc::new(Mutex::new(Vec::new())),
            list_gate: None,
            list_delay: None,
            detail_delay: None,
            details_in_flight: Arc::new(AtomicUsize::new(0)),
            max_details_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Serve these postings for `token`
    pub fn with_jobs(self, token: &str, jobs: Vec<MockJob>) -> Self {
        self.boards
            .lock()
            .unwrap()
            .insert(token.to_string(), MockBoard::Jobs(jobs));
        self
    }

    /// Serve `count` generic postings for `token`
    pub fn with_job_count(self, token: &str, count: u64) -> Self {
        let jobs = (1..=count)
            .map(|id| MockJob::new(id, &format!("Engineer {}", id)))
            .collect();
        self.with_jobs(token, jobs)
    }

    /// List calls for `token` fail with this status
    pub fn with_error(self, token: &str, status: u16, message: &str) -> Self {
        self.boards.lock().unwrap().insert(
            token.to_string(),
            MockBoard::Error {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// List calls wait for one permit from `gate` before answering
    pub fn with_list_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.list_gate = Some(gate);
        self
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = Some(delay);
        self
    }

    /// Tokens passed to list_jobs, in call order
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<(String, u64)> {
        self.detail_calls.lock().unwrap().clone()
    }

    /// Highest number of detail calls observed in flight at once
    pub fn max_details_in_flight(&self) -> usize {
        self.max_details_in_flight.load(Ordering::SeqCst)
    }

    fn board(&self, token: &str) -> Option<MockBoard> {
        self.boards.lock().unwrap().get(token).cloned()
    }

    fn summary(token: &str, job: &MockJob) -> BoardJobSummary {
        BoardJobSummary {
            id: job.id,
            title: job.title.clone(),
            location: job.location.clone().map(|name| NamedRef { name }),
            absolute_url: Some(format!("https://boards.greenhouse.io/{}/jobs/{}", token, job.id)),
            company_name: None,
            first_published: Some("2025-01-02T09:00:00Z".to_string()),
            updated_at: Some("2025-01-03T09:00:00Z".to_string()),
        }
    }

    fn detail(token: &str, job: &MockJob) -> BoardJobDetail {
        let workplace = if job.remote { "Remote" } else { "On-site" };
        BoardJobDetail {
            id: job.id,
            title: Some(job.title.clone()),
            content: Some(job.content.clone()),
            absolute_url: Some(format!("https://boards.greenhouse.io/{}/jobs/{}", token, job.id)),
            metadata: vec![MetadataField {
                name: "Workplace Type".to_string(),
                value: serde_json::Value::String(workplace.to_string()),
            }],
            departments: job
                .departments
                .iter()
                .map(|name| NamedRef { name: name.clone() })
                .collect(),
            offices: Vec::new(),
        }
    }
}

#[async_trait]
impl BaseBoardClient for MockBoardClient {
    async fn list_jobs(&self, token: &str) -> Result<Vec<BoardJobSummary>, GreenhouseError> {
        // Record the call before any gating so tests can observe it
        self.list_calls.lock().unwrap().push(token.to_string());

        if let Some(gate) = &self.list_gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }

        match self.board(token) {
            Some(MockBoard::Jobs(jobs)) => Ok(jobs.iter().map(|job| Self::summary(token, job)).collect()),
            Some(MockBoard::Error { status, message }) => Err(GreenhouseError::Api { status, message }),
            None => Err(GreenhouseError::NotFound {
                token: token.to_string(),
            }),
        }
    }

    async fn job_detail(&self, token: &str, job_id: u64) -> Result<BoardJobDetail, GreenhouseError> {
        self.detail_calls
            .lock()
            .unwrap()
            .push((token.to_string(), job_id));

        let in_flight = self.details_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_details_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let Some(delay) = self.detail_delay {
            tokio::time::sleep(delay).await;
        }
        self.details_in_flight.fetch_sub(1, Ordering::SeqCst);

        let job = match self.board(token) {
            Some(MockBoard::Jobs(jobs)) => jobs.into_iter().find(|job| job.id == job_id),
            _ => None,
        };

        match job {
            Some(job) if job.fail_detail => Err(GreenhouseError::Api {
                status: 500,
                message: "internal error".to_string(),
            }),
            Some(job) => Ok(Self::detail(token, &job)),
            None => Err(GreenhouseError::NotFound {
                token: token.to_string(),
            }),
        }
    }

    fn board_url(&self, token: &str) -> String {
        format!("https://boards.greenhouse.io/{}", token)
    }

    fn jobs_url(&self, token: &str) -> String {
        format!("https://boards-api.greenhouse.io/v1/boards/{}/jobs", token)
    }
}

// =============================================================================
// Memory Discovery Cache
// =============================================================================

/// Discovery cache held in memory
#[derive(Default)]
pub struct MemoryDiscoveryCache {
    snapshot: RwLock<Option<DiscoverySnapshot>>,
    saves: AtomicUsize,
    fail_saves: std::sync::atomic::AtomicBool,
}

impl MemoryDiscoveryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(self, snapshot: DiscoverySnapshot) -> Self {
        *self.snapshot.write().unwrap() = Some(snapshot);
        self
    }

    /// Make every save fail until switched off again
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<DiscoverySnapshot> {
        self.snapshot.read().unwrap().clone()
    }
}

#[async_trait]
impl BaseDiscoveryCache for MemoryDiscoveryCache {
    async fn load(&self) -> Result<Option<DiscoverySnapshot>> {
        Ok(self.current())
    }

    async fn save(&self, snapshot: &DiscoverySnapshot) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        *self.snapshot.write().unwrap() = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Memory Job Store
// =============================================================================

/// Job store held in memory, keyed by source id
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
    fail_upserts: RwLock<HashSet<String>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts for `source_id` fail
    pub fn with_failing_upsert(self, source_id: &str) -> Self {
        self.fail_upserts
            .write()
            .unwrap()
            .insert(source_id.to_string());
        self
    }

    pub fn get(&self, source_id: &str) -> Option<Job> {
        self.jobs.read().unwrap().get(source_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseJobStore for MemoryJobStore {
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<Job>> {
        Ok(self.get(source_id))
    }

    async fn upsert(&self, job: &UpsertJob, seen_at: DateTime<Utc>) -> Result<Job> {
        if self.fail_upserts.read().unwrap().contains(&job.source_id) {
            anyhow::bail!("write conflict on {}", job.source_id);
        }

        let mut jobs = self.jobs.write().unwrap();
        let (id, first_seen_at, created_at) = match jobs.get(&job.source_id) {
            Some(existing) => (existing.id, existing.first_seen_at, existing.created_at),
            None => (Uuid::new_v4(), seen_at, seen_at),
        };

        let record = Job {
            id,
            source_id: job.source_id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            url: job.url.clone(),
            description: job.description.clone(),
            skills: job.skills.clone(),
            department: job.department.clone(),
            employment_type: job.employment_type.clone(),
            is_remote: job.is_remote,
            experience_level: job.experience_level.to_string(),
            source: job.source.clone(),
            posted_at: job.posted_at,
            fetched_at: seen_at,
            first_seen_at,
            last_seen_at: seen_at,
            is_active: true,
            created_at,
            updated_at: seen_at,
        };

        jobs.insert(record.source_id.clone(), record.clone());
        Ok(record)
    }

    async fn stats(&self) -> Result<JobStats> {
        let jobs = self.jobs.read().unwrap();
        let companies: HashSet<&str> = jobs.values().map(|j| j.company.as_str()).collect();

        Ok(JobStats {
            total_jobs: jobs.len() as i64,
            active_jobs: jobs.values().filter(|j| j.is_active).count() as i64,
            companies_count: companies.len() as i64,
            last_ingested_at: jobs.values().map(|j| j.fetched_at).max(),
        })
    }

    async fn top_skills(&self, query: &SkillQuery) -> Result<Vec<SkillCount>> {
        let jobs = self.jobs.read().unwrap();
        let level = query.experience_level.map(|l| l.to_string());
        let company = query.company.as_ref().map(|c| c.to_lowercase());

        let mut counts: HashMap<&str, i64> = HashMap::new();
        for job in jobs.values() {
            if level.as_ref().is_some_and(|l| &job.experience_level != l) {
                continue;
            }
            if company
                .as_ref()
                .is_some_and(|c| !job.company.to_lowercase().contains(c.as_str()))
            {
                continue;
            }
            for skill in &job.skills {
                *counts.entry(skill.as_str()).or_default() += 1;
            }
        }

        let mut ranked: Vec<SkillCount> = counts
            .into_iter()
            .map(|(skill, count)| SkillCount {
                skill: skill.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
        ranked.truncate(query.limit.max(0) as usize);
        Ok(ranked)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock-backed dependencies with handles kept for assertions
pub struct TestDependencies {
    pub board: Arc<MockBoardClient>,
    pub candidates: Arc<StaticCandidateSource>,
    pub discovery_cache: Arc<MemoryDiscoveryCache>,
    pub job_store: Arc<MemoryJobStore>,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            board: Arc::new(MockBoardClient::new()),
            candidates: Arc::new(StaticCandidateSource::from_tokens(Vec::<String>::new())),
            discovery_cache: Arc::new(MemoryDiscoveryCache::new()),
            job_store: Arc::new(MemoryJobStore::new()),
        }
    }

    pub fn with_board(mut self, board: MockBoardClient) -> Self {
        self.board = Arc::new(board);
        self
    }

    pub fn with_candidates(mut self, tokens: &[&str]) -> Self {
        self.candidates = Arc::new(StaticCandidateSource::from_tokens(tokens));
        self
    }

    pub fn with_discovery_cache(mut self, cache: MemoryDiscoveryCache) -> Self {
        self.discovery_cache = Arc::new(cache);
        self
    }

    pub fn with_job_store(mut self, store: MemoryJobStore) -> Self {
        self.job_store = Arc::new(store);
        self
    }

    /// Convert to ServerDeps sharing the same mock instances
    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.board.clone(),
            self.candidates.clone(),
            self.discovery_cache.clone(),
            self.job_store.clone(),
            SkillExtractor::builtin(),
        )
    }
}
