// file: src/models/summary.rs
// description: per-record outcome of the summarization stage

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// Abstractive summary produced by the summarization engine
    Summarized(String),

    /// Truncated raw abstract, used when the engine is unavailable or failed on this record
    Fallback(String),

    /// Summaries were not requested; the full abstract is shown
    NotRequested,
}

impl SummaryOutcome {
    pub fn is_summarized(&self) -> bool {
        matches!(self, SummaryOutcome::Summarized(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SummaryOutcome::Fallback(_))
    }
}
