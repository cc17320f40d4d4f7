// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: search pipeline orchestration

pub mod filter;
mod orchestrator;
mod progress;
pub mod ranker;

pub use filter::{filter_recent, recency_cutoff};
pub use orchestrator::{PipelineOutcome, SearchPipeline};
pub use progress::{RunStats, StageProgress};
pub use ranker::{clear_scores, rank_records};
