//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod pacing;
pub mod run_guard;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GreenhouseAdapter, ServerDeps};
pub use pacing::Pacer;
pub use run_guard::{RunGuard, RunPermit};
pub use scheduled_tasks::DiscoveryScheduler;
pub use test_dependencies::{
    MemoryDiscoveryCache, MemoryJobStore, MockBoardClient, MockJob, TestDependencies,
};
pub use traits::*;
