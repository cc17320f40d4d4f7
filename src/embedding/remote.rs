// file: src/embedding/remote.rs
// description: OpenAI-compatible embeddings endpoint as a text encoder
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::RankingConfig;
use crate::embedding::TextEncoder;
use crate::error::{PipelineError, Result};
use crate::http_api::ApiClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

pub struct ApiEncoder {
    api: ApiClient,
    model: String,
}

impl ApiEncoder {
    pub fn new(api: ApiClient, model: String) -> Self {
        Self { api, model }
    }

    /// Requires an API key and a provider that serves the configured model.
    pub async fn load(config: &RankingConfig) -> Result<Self> {
        let api = ApiClient::from_optional_key(&config.api_base, config.api_key.as_deref())?;
        api.check_model(&config.api_model).await?;
        Ok(Self::new(api, config.api_model.clone()))
    }
}

#[async_trait]
impl TextEncoder for ApiEncoder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(
            "Requesting {} embeddings from {}",
            texts.len(),
            self.api.api_base()
        );

        let request = EmbeddingRequest {
            input: texts,
            model: &self.model,
        };

        let mut response: EmbeddingResponse = self
            .api
            .post_json("embeddings", &request, PipelineError::Embedding)
            .await?;

        if response.data.len() != texts.len() {
            return Err(PipelineError::Embedding(format!(
                "expected {} embeddings, received {}",
                texts.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|item| item.index);
        Ok(response.data.into_iter().map(|item| item.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
