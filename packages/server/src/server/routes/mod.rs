// HTTP routes
pub mod companies;
pub mod health;
pub mod ingestion;

pub use companies::*;
pub use health::*;
pub use ingestion::*;
