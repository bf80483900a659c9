// SkillSeekr - Core
//
// Discovers companies with public job boards, ingests their postings, and
// classifies each posting's skills and experience level.
//
// Domain logic lives in domains/*, infrastructure seams in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
