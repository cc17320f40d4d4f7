// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod embedding;
pub mod engines;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod feed;
pub mod http_api;
pub mod models;
pub mod pipeline;
pub mod presenter;
pub mod session;
pub mod summarizer;
pub mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::{Config, DisplayConfig, FeedConfig, RankingBackend, RankingConfig, SummarizerConfig};
pub use embedding::{ApiEncoder, LocalEncoder, TextEncoder, cosine_similarity};
pub use engines::{Capability, EngineRegistry, SharedEncoder, SharedSummarizer};
pub use error::{PipelineError, Result};
pub use exporter::JsonExporter;
pub use extractor::extract_repo_links;
pub use feed::{ArxivClient, FeedQuery, FetchedFeed};
pub use models::{CandidateRecord, DisplayedPaper, Domain, SearchConfig, SearchReport, SummaryOutcome};
pub use pipeline::{PipelineOutcome, RunStats, SearchPipeline};
pub use presenter::TerminalPresenter;
pub use session::{InteractiveSession, SessionCommand};
pub use summarizer::{ChatSummarizer, DecodingBounds, SummarizationSettings, Summarizer};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
