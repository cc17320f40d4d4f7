// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Feed request failed with status {status}: {body}")]
    FeedStatus { status: u16, body: String },

    #[error("Feed parse error: {0}")]
    FeedParse(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
