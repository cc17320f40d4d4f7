// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod paper;
pub mod search_config;
pub mod search_result;
pub mod summary;

pub use paper::CandidateRecord;
pub use search_config::{Domain, SearchConfig};
pub use search_result::{DisplayedPaper, SearchReport};
pub use summary::SummaryOutcome;
