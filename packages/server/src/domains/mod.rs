// Business domains
pub mod discovery;
pub mod jobs;
