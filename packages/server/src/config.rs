use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use greenhouse_client::{DEFAULT_API_BASE, DEFAULT_BOARD_BASE};

/// Upper bound for concurrent job-detail requests per company.
pub const MAX_DETAIL_FETCH_CONCURRENCY: usize = 32;

/// Longest accepted discovery cache lifetime (one year).
pub const MAX_DISCOVERY_AGE_HOURS: i64 = 24 * 365;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub board: BoardConfig,
    pub discovery: DiscoveryConfig,
    pub ingestion: IngestionConfig,
    pub scheduler: SchedulerConfig,
}

/// Where the board API lives and which companies to probe.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub api_base: String,
    pub page_base: String,
    pub candidates_file: Option<PathBuf>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_base: DEFAULT_BOARD_BASE.to_string(),
            candidates_file: None,
        }
    }
}

impl BoardConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: env::var("BOARD_API_BASE").unwrap_or(defaults.api_base),
            page_base: env::var("BOARD_PAGE_BASE").unwrap_or(defaults.page_base),
            candidates_file: env::var("CANDIDATES_FILE").ok().map(PathBuf::from),
        }
    }
}

/// Tunables for discovery probing and the snapshot cache.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub cache_path: PathBuf,
    pub probe_delay: Duration,
    pub probe_timeout: Duration,
    pub max_age_hours: i64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("data/discovered-companies.json"),
            probe_delay: Duration::from_millis(300),
            probe_timeout: Duration::from_secs(5),
            max_age_hours: 24,
        }
    }
}

impl DiscoveryConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            cache_path: env::var("DISCOVERY_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            probe_delay: Duration::from_millis(env_parse(
                "DISCOVERY_PROBE_DELAY_MS",
                defaults.probe_delay.as_millis() as u64,
            )?),
            probe_timeout: defaults.probe_timeout,
            max_age_hours: validate_max_age_hours(env_parse(
                "DISCOVERY_MAX_AGE_HOURS",
                defaults.max_age_hours,
            )?)?,
        })
    }
}

/// Tunables for job ingestion.
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub company_delay: Duration,
    pub detail_concurrency: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            company_delay: Duration::from_millis(500),
            detail_concurrency: 8,
        }
    }
}

/// Timing of the background discovery scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Delay between process start and the first discovery check.
    pub startup_delay: Duration,
    /// Interval between discovery checks.
    pub check_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            startup_delay: Duration::from_secs(10),
            check_interval: Duration::from_secs(60 * 60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let ingestion_defaults = IngestionConfig::default();

        let detail_concurrency: usize =
            env_parse("DETAIL_FETCH_CONCURRENCY", ingestion_defaults.detail_concurrency)?;

        let ingestion = IngestionConfig {
            company_delay: Duration::from_millis(env_parse(
                "INGESTION_COMPANY_DELAY_MS",
                ingestion_defaults.company_delay.as_millis() as u64,
            )?),
            detail_concurrency: detail_concurrency.clamp(1, MAX_DETAIL_FETCH_CONCURRENCY),
        };

        let scheduler = SchedulerConfig {
            enabled: env_parse("SCHEDULER_ENABLED", true)?,
            ..SchedulerConfig::default()
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env_parse("PORT", 8080u16)?,
            board: BoardConfig::from_env(),
            discovery: DiscoveryConfig::from_env()?,
            ingestion,
            scheduler,
        })
    }
}

/// Staleness threshold must be positive and at most a year.
fn validate_max_age_hours(hours: i64) -> Result<i64> {
    if (1..=MAX_DISCOVERY_AGE_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        anyhow::bail!(
            "DISCOVERY_MAX_AGE_HOURS must be between 1 and {MAX_DISCOVERY_AGE_HOURS}, got {hours}"
        )
    }
}

/// Read an optional variable, falling back to `default` when unset.
fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let discovery = DiscoveryConfig::default();
        assert_eq!(discovery.probe_delay, Duration::from_millis(300));
        assert_eq!(discovery.probe_timeout, Duration::from_secs(5));
        assert_eq!(discovery.max_age_hours, 24);

        let ingestion = IngestionConfig::default();
        assert_eq!(ingestion.company_delay, Duration::from_millis(500));

        let scheduler = SchedulerConfig::default();
        assert_eq!(scheduler.startup_delay, Duration::from_secs(10));
        assert_eq!(scheduler.check_interval, Duration::from_secs(3600));
    }

    #[test]
    fn test_max_age_hours_bounds() {
        assert_eq!(validate_max_age_hours(1).unwrap(), 1);
        assert_eq!(validate_max_age_hours(24).unwrap(), 24);
        assert_eq!(validate_max_age_hours(MAX_DISCOVERY_AGE_HOURS).unwrap(), MAX_DISCOVERY_AGE_HOURS);

        assert!(validate_max_age_hours(0).is_err());
        assert!(validate_max_age_hours(-5).is_err());
        assert!(validate_max_age_hours(i64::MAX)
            .unwrap_err()
            .to_string()
            .contains("DISCOVERY_MAX_AGE_HOURS"));
    }

    #[test]
    fn test_env_parse_uses_default_when_unset() {
        let value: u64 = env_parse("SKILLSEEKR_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
