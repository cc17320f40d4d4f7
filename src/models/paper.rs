// file: src/models/paper.rs
// description: candidate record for one fetched paper
// reference: arXiv Atom entry fields

use crate::utils::text::collapse_whitespace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Feed identifier, e.g. `http://arxiv.org/abs/2501.01234v1`
    pub id: String,

    pub title: String,

    /// Canonical abstract page
    pub link: String,

    #[serde(rename = "abstract")]
    pub abstract_text: String,

    pub published: DateTime<Utc>,

    /// Ordered author names, display only
    pub authors: Vec<String>,

    /// Cosine similarity to the query. `None` means the record was not ranked.
    pub score: Option<f32>,
}

impl CandidateRecord {
    pub fn new(
        id: String,
        title: String,
        link: String,
        abstract_text: String,
        published: DateTime<Utc>,
        authors: Vec<String>,
    ) -> Self {
        Self {
            id,
            title,
            link,
            abstract_text,
            published,
            authors,
            score: None,
        }
    }

    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    /// Text fed to the encoder: `title. abstract` with the abstract's whitespace collapsed.
    pub fn document_text(&self) -> String {
        format!("{}. {}", self.title, collapse_whitespace(&self.abstract_text))
    }

    /// PDF location derived from the canonical link by swapping the `/abs/` path segment.
    /// Links without that segment have no derivable PDF.
    pub fn pdf_link(&self) -> Option<String> {
        if self.link.contains("/abs/") {
            Some(self.link.replacen("/abs/", "/pdf/", 1))
        } else {
            None
        }
    }

    pub fn published_date(&self) -> String {
        self.published.format("%Y-%m-%d").to_string()
    }
}
