//! Jobs domain models.

pub mod fetched_job;
pub mod job;

pub use fetched_job::*;
pub use job::*;
