// file: src/models/search_result.rs
// description: rendered records and the report produced by one pipeline run
// reference: serialized by the json exporter

use crate::models::{CandidateRecord, SummaryOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayedPaper {
    /// 1-based position in the rendered list
    pub index: usize,

    #[serde(flatten)]
    pub record: CandidateRecord,

    pub pdf_link: Option<String>,

    pub summary: SummaryOutcome,

    /// GitHub repository links found in the abstract
    pub repo_links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Unencoded search expression sent to the feed
    pub query_expression: String,

    /// Text embedded as the ranking query
    pub ranking_query: String,

    pub generated_at: DateTime<Utc>,

    /// Records that survived the recency filter
    pub fetched: usize,

    pub displayed: usize,

    pub ranked: bool,

    pub papers: Vec<DisplayedPaper>,

    /// Warning shown when summaries were requested but the engine could not be loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarizer_warning: Option<String>,
}

impl SearchReport {
    pub fn new(
        query_expression: String,
        ranking_query: String,
        generated_at: DateTime<Utc>,
        fetched: usize,
        ranked: bool,
        papers: Vec<DisplayedPaper>,
    ) -> Self {
        Self {
            query_expression,
            ranking_query,
            generated_at,
            fetched,
            displayed: papers.len(),
            ranked,
            papers,
            summarizer_warning: None,
        }
    }

    pub fn with_summarizer_warning(mut self, warning: Option<String>) -> Self {
        self.summarizer_warning = warning;
        self
    }

    pub fn completion_line(&self) -> String {
        format!(
            "Displayed {} papers (from {} fetched).",
            self.displayed, self.fetched
        )
    }
}
