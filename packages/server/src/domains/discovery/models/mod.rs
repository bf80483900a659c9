//! Discovery domain models.

pub mod snapshot;

pub use snapshot::*;
