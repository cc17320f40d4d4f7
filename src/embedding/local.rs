// file: src/embedding/local.rs
// description: on-device sentence embeddings through fastembed
// reference: https://docs.rs/fastembed

use crate::embedding::TextEncoder;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub struct LocalEncoder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
}

/// Maps a sentence-transformers style name onto a fastembed model.
pub fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    let normalized = name
        .trim()
        .to_ascii_lowercase()
        .trim_start_matches("sentence-transformers/")
        .trim_start_matches("baai/")
        .to_string();

    match normalized.as_str() {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
        _ => Err(PipelineError::Config(format!(
            "unsupported local embedding model: {}",
            name
        ))),
    }
}

impl LocalEncoder {
    /// Loads (downloading on first use) the model. Blocking; run off the async executor.
    pub fn load(model_name: &str, cache_dir: Option<&Path>) -> Result<Self> {
        let model = resolve_model(model_name)?;
        info!("Loading local embedding model {}", model_name);

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir.to_path_buf());
        }

        let embedding = TextEmbedding::try_new(options).map_err(|e| {
            PipelineError::Embedding(format!("Failed to initialize {}: {}", model_name, e))
        })?;

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: model_name.to_string(),
        })
    }
}

#[async_trait]
impl TextEncoder for LocalEncoder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let model = Arc::clone(&self.model);
        let inputs = texts.to_vec();
        debug!("Embedding {} texts locally", inputs.len());

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| PipelineError::Embedding("encoder lock poisoned".to_string()))?;
            model
                .embed(inputs, None)
                .map_err(|e| PipelineError::Embedding(format!("Embedding generation failed: {}", e)))
        })
        .await
        .map_err(|e| PipelineError::Embedding(format!("Embedding task failed: {}", e)))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for LocalEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEncoder")
            .field("model_name", &self.model_name)
            .finish()
    }
}
