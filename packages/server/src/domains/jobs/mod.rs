//! Jobs domain - fetch board postings, classify skills and seniority, store with history

pub mod activities;
pub mod models;
pub mod skills;
pub mod store;

// Re-export actions
pub use activities::{IngestionCoordinator, IngestionResult, IngestionRunSummary, JobFetcher};

// Re-export models
pub use models::{FetchedJob, Job, JobStats, SkillCount, SkillQuery, UpsertJob};

pub use skills::{ExperienceLevel, SkillCategories, SkillExtractor};
pub use store::PostgresJobStore;
