// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::models::SearchConfig;
use crate::models::search_config::{MAX_DAYS_BACK, MAX_DISPLAY_COUNT, MAX_FETCH_LIMIT};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "SEMANTIC_ARXIV";
pub const SHARED_API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub feed: FeedConfig,
    pub search: SearchConfig,
    pub ranking: RankingConfig,
    pub summarizer: SummarizerConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingBackend {
    Local,
    Api,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingConfig {
    pub backend: RankingBackend,
    pub local_model: String,
    pub cache_dir: Option<PathBuf>,
    pub api_base: String,
    pub api_key: Option<String>,
    pub api_model: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarizerConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub primary_model: String,
    pub fallback_model: String,
    pub max_length: usize,
    pub min_length: usize,
    pub max_input_words: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub abstract_fallback_chars: usize,
    pub max_repo_links: usize,
}

impl Config {
    /// Layers built-in defaults, the optional TOML file and `SEMANTIC_ARXIV__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.apply_shared_api_key(std::env::var(SHARED_API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            feed: FeedConfig {
                base_url: "https://export.arxiv.org/api/query".to_string(),
                user_agent: format!("semantic_arxiv/{}", env!("CARGO_PKG_VERSION")),
                timeout_secs: Some(60),
            },
            search: SearchConfig::default(),
            ranking: RankingConfig {
                backend: RankingBackend::Local,
                local_model: "all-MiniLM-L6-v2".to_string(),
                cache_dir: None,
                api_base: "https://api.openai.com/v1".to_string(),
                api_key: None,
                api_model: "text-embedding-3-small".to_string(),
            },
            summarizer: SummarizerConfig {
                api_base: "https://api.groq.com/openai/v1".to_string(),
                api_key: None,
                primary_model: "llama-3.1-8b-instant".to_string(),
                fallback_model: "llama-3.3-70b-versatile".to_string(),
                max_length: 80,
                min_length: 20,
                max_input_words: 512,
            },
            display: DisplayConfig {
                abstract_fallback_chars: 1000,
                max_repo_links: 3,
            },
        }
    }

    /// Fills unset API keys from the shared provider key.
    fn apply_shared_api_key(&mut self, shared: Option<String>) {
        let Some(shared) = shared.filter(|key| !key.trim().is_empty()) else {
            return;
        };
        if self.summarizer.api_key.is_none() {
            self.summarizer.api_key = Some(shared.clone());
        }
        if self.ranking.api_key.is_none() {
            self.ranking.api_key = Some(shared);
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.feed.base_url)?;
        Validator::validate_url(&self.summarizer.api_base)?;
        Validator::validate_url(&self.ranking.api_base)?;
        Validator::validate_not_empty("ranking.local_model", &self.ranking.local_model)?;
        Validator::validate_not_empty("ranking.api_model", &self.ranking.api_model)?;
        Validator::validate_not_empty("summarizer.primary_model", &self.summarizer.primary_model)?;
        Validator::validate_not_empty("summarizer.fallback_model", &self.summarizer.fallback_model)?;

        if self.feed.timeout_secs == Some(0) {
            return Err(PipelineError::Config(
                "feed.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_range("search.max_results", self.search.max_results, 1, MAX_FETCH_LIMIT)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Validator::validate_range(
            "search.display_count",
            self.search.display_count,
            1,
            MAX_DISPLAY_COUNT,
        )
        .map_err(|e| PipelineError::Config(e.to_string()))?;
        Validator::validate_range("search.days_back", self.search.days_back, 1, MAX_DAYS_BACK)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.summarizer.max_length == 0 || self.summarizer.min_length == 0 {
            return Err(PipelineError::Config(
                "summarizer length bounds must be greater than 0".to_string(),
            ));
        }

        if self.summarizer.min_length > self.summarizer.max_length {
            return Err(PipelineError::Config(format!(
                "summarizer.min_length ({}) exceeds max_length ({})",
                self.summarizer.min_length, self.summarizer.max_length
            )));
        }

        if self.summarizer.max_input_words == 0 {
            return Err(PipelineError::Config(
                "summarizer.max_input_words must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
