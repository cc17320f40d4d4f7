// file: src/summarizer/mod.rs
// description: abstractive summarization of abstracts with per-record fallback
// reference: internal module structure

pub mod chat;

use crate::config::{DisplayConfig, SummarizerConfig};
use crate::error::Result;
use crate::models::SummaryOutcome;
use crate::utils::text::{truncate_chars, truncate_words, word_count};
use async_trait::async_trait;
use tracing::{debug, warn};

pub use chat::ChatSummarizer;

/// Fixed decoding limits for every summary. Lengths are in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodingBounds {
    pub max_length: usize,
    pub min_length: usize,
    pub do_sample: bool,
}

impl Default for DecodingBounds {
    fn default() -> Self {
        Self {
            max_length: 80,
            min_length: 20,
            do_sample: false,
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, bounds: &DecodingBounds) -> Result<String>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizationSettings {
    pub bounds: DecodingBounds,
    pub max_input_words: usize,
    pub fallback_chars: usize,
}

impl SummarizationSettings {
    pub fn from_config(summarizer: &SummarizerConfig, display: &DisplayConfig) -> Self {
        Self {
            bounds: DecodingBounds {
                max_length: summarizer.max_length,
                min_length: summarizer.min_length,
                do_sample: false,
            },
            max_input_words: summarizer.max_input_words,
            fallback_chars: display.abstract_fallback_chars,
        }
    }

    /// Abstract capped at `max_input_words` whitespace-delimited tokens.
    pub fn prepare_input(&self, abstract_text: &str) -> String {
        if word_count(abstract_text) > self.max_input_words {
            debug!(
                "Truncating abstract from {} to {} words",
                word_count(abstract_text),
                self.max_input_words
            );
        }
        truncate_words(abstract_text, self.max_input_words)
    }

    pub fn fallback(&self, abstract_text: &str) -> SummaryOutcome {
        SummaryOutcome::Fallback(truncate_chars(abstract_text, self.fallback_chars))
    }
}

impl Default for SummarizationSettings {
    fn default() -> Self {
        Self {
            bounds: DecodingBounds::default(),
            max_input_words: 512,
            fallback_chars: 1000,
        }
    }
}

/// Summarizes one abstract. Any failure, including an empty reply, falls back
/// to the truncated abstract for this record only.
pub async fn summarize_record(
    summarizer: &dyn Summarizer,
    abstract_text: &str,
    settings: &SummarizationSettings,
) -> SummaryOutcome {
    let input = settings.prepare_input(abstract_text);

    match summarizer.summarize(&input, &settings.bounds).await {
        Ok(summary) if !summary.trim().is_empty() => {
            SummaryOutcome::Summarized(summary.trim().to_string())
        }
        Ok(_) => {
            warn!("Summarizer {} returned an empty summary", summarizer.model_name());
            settings.fallback(abstract_text)
        }
        Err(e) => {
            warn!("Summarization failed, showing abstract instead: {}", e);
            settings.fallback(abstract_text)
        }
    }
}
