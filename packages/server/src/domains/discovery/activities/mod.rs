//! Discovery domain actions
//!
//! - `probe`: check one candidate board against the board API
//! - `run_discovery`: sequential, paced probing of all candidates into a ranked snapshot

pub mod probe;
pub mod run_discovery;

pub use probe::probe_board;
pub use run_discovery::{DiscoveryEngine, DiscoveryProgress};
