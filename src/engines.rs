// file: src/engines.rs
// description: lazily-loaded, process-wide encoder and summarizer handles
// reference: https://docs.rs/tokio/latest/tokio/sync/struct.OnceCell.html

use crate::config::{Config, RankingBackend, RankingConfig, SummarizerConfig};
use crate::embedding::{ApiEncoder, LocalEncoder, TextEncoder};
use crate::error::PipelineError;
use crate::summarizer::{ChatSummarizer, Summarizer};
use crate::utils::HealthCheck;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{info, warn};

pub type SharedEncoder = Arc<dyn TextEncoder>;
pub type SharedSummarizer = Arc<dyn Summarizer>;

/// Result of probing an optional engine once at load time.
#[derive(Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Capability<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Capability::Available(engine) => Some(engine),
            Capability::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Capability::Available(_) => None,
            Capability::Unavailable(reason) => Some(reason),
        }
    }
}

impl<T> From<Result<T, PipelineError>> for Capability<T> {
    fn from(result: Result<T, PipelineError>) -> Self {
        match result {
            Ok(engine) => Capability::Available(engine),
            Err(e) => Capability::Unavailable(e.to_string()),
        }
    }
}

/// Each engine is constructed at most once, on first request, and shared read-only afterwards.
/// A failed load is remembered as `Unavailable` for the rest of the process.
pub struct EngineRegistry {
    ranking: RankingConfig,
    summarization: SummarizerConfig,
    encoder: OnceCell<Capability<SharedEncoder>>,
    summarizer: OnceCell<Capability<SharedSummarizer>>,
}

static GLOBAL_REGISTRY: OnceLock<EngineRegistry> = OnceLock::new();

impl EngineRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            ranking: config.ranking.clone(),
            summarization: config.summarizer.clone(),
            encoder: OnceCell::new(),
            summarizer: OnceCell::new(),
        }
    }

    /// Registry whose engines are already decided; nothing is loaded lazily.
    pub fn with_engines(
        config: &Config,
        encoder: Capability<SharedEncoder>,
        summarizer: Capability<SharedSummarizer>,
    ) -> Self {
        Self {
            ranking: config.ranking.clone(),
            summarization: config.summarizer.clone(),
            encoder: OnceCell::new_with(Some(encoder)),
            summarizer: OnceCell::new_with(Some(summarizer)),
        }
    }

    /// The process-wide registry. The first caller's configuration wins.
    pub fn global(config: &Config) -> &'static EngineRegistry {
        GLOBAL_REGISTRY.get_or_init(|| EngineRegistry::new(config))
    }

    pub async fn encoder(&self) -> &Capability<SharedEncoder> {
        self.encoder
            .get_or_init(|| load_encoder(self.ranking.clone()))
            .await
    }

    pub async fn summarizer(&self) -> &Capability<SharedSummarizer> {
        self.summarizer
            .get_or_init(|| load_summarizer(self.summarization.clone()))
            .await
    }

    pub fn encoder_loaded(&self) -> bool {
        self.encoder.initialized()
    }

    pub fn summarizer_loaded(&self) -> bool {
        self.summarizer.initialized()
    }

    /// Loads both engines (if not yet loaded) and reports their availability.
    pub async fn health_checks(&self) -> Vec<HealthCheck> {
        let started = Instant::now();
        let encoder = capability_check("encoder", self.encoder().await, |e| e.model_name(), started);

        let started = Instant::now();
        let summarizer =
            capability_check("summarizer", self.summarizer().await, |s| s.model_name(), started);

        vec![encoder, summarizer]
    }
}

fn capability_check<T>(
    component: &str,
    capability: &Capability<T>,
    model_name: impl Fn(&T) -> &str,
    started: Instant,
) -> HealthCheck {
    match capability {
        Capability::Available(engine) => HealthCheck::healthy(
            component,
            Some(format!("loaded: {}", model_name(engine))),
            started.elapsed(),
        ),
        Capability::Unavailable(reason) => {
            HealthCheck::degraded(component, reason.clone(), started.elapsed())
        }
    }
}

async fn load_encoder(config: RankingConfig) -> Capability<SharedEncoder> {
    let loaded: Result<SharedEncoder, PipelineError> = match config.backend {
        RankingBackend::Local => {
            let model_name = config.local_model.clone();
            let cache_dir = config.cache_dir.clone();
            tokio::task::spawn_blocking(move || {
                LocalEncoder::load(&model_name, cache_dir.as_deref())
            })
            .await
            .map_err(|e| PipelineError::Embedding(format!("Encoder load task failed: {}", e)))
            .and_then(|result| result)
            .map(|encoder| Arc::new(encoder) as SharedEncoder)
        }
        RankingBackend::Api => ApiEncoder::load(&config)
            .await
            .map(|encoder| Arc::new(encoder) as SharedEncoder),
    };

    match &loaded {
        Ok(encoder) => info!("Embedding encoder ready: {}", encoder.model_name()),
        Err(e) => warn!("Embedding encoder unavailable, ranking disabled: {}", e),
    }

    loaded.into()
}

async fn load_summarizer(config: SummarizerConfig) -> Capability<SharedSummarizer> {
    let loaded = ChatSummarizer::load(&config)
        .await
        .map(|summarizer| Arc::new(summarizer) as SharedSummarizer);

    if let Err(e) = &loaded {
        warn!("Summarizer unavailable, abstracts will be shown instead: {}", e);
    }

    loaded.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::summarizer::DecodingBounds;
    use async_trait::async_trait;

    struct FixedEncoder;

    #[async_trait]
    impl TextEncoder for FixedEncoder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, text: &str, _bounds: &DecodingBounds) -> Result<String> {
            Ok(text.to_string())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_capability_from_result() {
        let ok: Capability<u8> = Ok(3).into();
        assert_eq!(ok.available(), Some(&3));

        let err: Capability<u8> =
            Err(PipelineError::Config("missing key".to_string())).into();
        assert!(!err.is_available());
        assert!(err.unavailable_reason().unwrap().contains("missing key"));
    }

    #[tokio::test]
    async fn test_preloaded_engines_are_returned() {
        let config = Config::default_config();
        let registry = EngineRegistry::with_engines(
            &config,
            Capability::Available(Arc::new(FixedEncoder)),
            Capability::Available(Arc::new(EchoSummarizer)),
        );

        assert!(registry.encoder_loaded());
        let encoder = registry.encoder().await.available().unwrap();
        assert_eq!(encoder.model_name(), "fixed");

        let checks = registry.health_checks().await;
        assert_eq!(checks.len(), 2);
        assert!(checks.iter().all(|c| c.status == crate::utils::HealthStatus::Healthy));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_summarizer_unavailable_once() {
        let mut config = Config::default_config();
        config.summarizer.api_key = None;
        let registry = EngineRegistry::new(&config);

        assert!(!registry.summarizer_loaded());
        let first = registry.summarizer().await;
        assert!(!first.is_available());
        assert!(registry.summarizer_loaded());

        let second = registry.summarizer().await;
        assert!(std::ptr::eq(first, second));
    }

    #[tokio::test]
    async fn test_api_encoder_without_key_is_unavailable() {
        let mut config = Config::default_config();
        config.ranking.backend = RankingBackend::Api;
        config.ranking.api_key = None;
        let registry = EngineRegistry::new(&config);

        let checks = registry.health_checks().await;
        assert_eq!(checks[0].component, "encoder");
        assert_eq!(checks[0].status, crate::utils::HealthStatus::Degraded);
    }
}
