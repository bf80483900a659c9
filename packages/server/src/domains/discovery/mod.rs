//! Discovery domain - find company boards worth ingesting and cache the result

pub mod activities;
pub mod cache;
pub mod candidates;
pub mod models;
pub mod service;

// Re-export actions
pub use activities::{probe_board, DiscoveryEngine, DiscoveryProgress};

// Re-export models
pub use models::{DiscoveryResult, DiscoverySnapshot, DiscoveryStatus};

pub use cache::FileDiscoveryCache;
pub use candidates::{normalize_candidates, StaticCandidateSource};
pub use service::{CheckOutcome, DiscoveryService};
