// file: src/summarizer/chat.rs
// description: summarization through an OpenAI-compatible chat completions endpoint
// reference: https://console.groq.com/docs/api-reference#chat-create

use crate::config::SummarizerConfig;
use crate::error::{PipelineError, Result};
use crate::http_api::ApiClient;
use crate::summarizer::{DecodingBounds, Summarizer};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct ChatSummarizer {
    api: ApiClient,
    model: String,
}

impl ChatSummarizer {
    pub fn new(api: ApiClient, model: String) -> Self {
        Self { api, model }
    }

    /// Tries the primary model, then the fallback. Fails when neither is served.
    pub async fn load(config: &SummarizerConfig) -> Result<Self> {
        let api = ApiClient::from_optional_key(&config.api_base, config.api_key.as_deref())?;

        let mut last_error = None;
        for model in [&config.primary_model, &config.fallback_model] {
            match api.check_model(model).await {
                Ok(()) => {
                    info!("Summarizer ready with model {}", model);
                    return Ok(Self::new(api, model.clone()));
                }
                Err(e) => {
                    warn!("Summarizer model {} failed to load: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            PipelineError::Summarization("no summarizer model configured".to_string())
        }))
    }

    fn instruction(bounds: &DecodingBounds) -> String {
        format!(
            "Summarize the research abstract you are given. Reply with the summary only, \
             in plain prose, between {} and {} tokens long.",
            bounds.min_length, bounds.max_length
        )
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, text: &str, bounds: &DecodingBounds) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::instruction(bounds),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: if bounds.do_sample { 1.0 } else { 0.0 },
            max_tokens: bounds.max_length,
            stream: false,
        };

        debug!("Summarizing {} chars with {}", text.len(), self.model);

        let response: ChatResponse = self
            .api
            .post_json("chat/completions", &request, PipelineError::Summarization)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| PipelineError::Summarization("no choices returned".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summarizer_config(server: &MockServer) -> SummarizerConfig {
        let mut config = Config::default_config().summarizer;
        config.api_base = format!("{}/openai/v1", server.uri());
        config.api_key = Some("test-key".to_string());
        config.primary_model = "primary".to_string();
        config.fallback_model = "secondary".to_string();
        config
    }

    async fn serve_model(server: &MockServer, model: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/openai/v1/models/{}", model)))
            .respond_with(ResponseTemplate::new(status).set_body_string("{}"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_load_prefers_primary() {
        let server = MockServer::start().await;
        serve_model(&server, "primary", 200).await;
        serve_model(&server, "secondary", 200).await;

        let summarizer = ChatSummarizer::load(&summarizer_config(&server)).await.unwrap();
        assert_eq!(summarizer.model_name(), "primary");
    }

    #[tokio::test]
    async fn test_load_falls_back_to_secondary() {
        let server = MockServer::start().await;
        serve_model(&server, "primary", 404).await;
        serve_model(&server, "secondary", 200).await;

        let summarizer = ChatSummarizer::load(&summarizer_config(&server)).await.unwrap();
        assert_eq!(summarizer.model_name(), "secondary");
    }

    #[tokio::test]
    async fn test_load_fails_when_both_models_fail() {
        let server = MockServer::start().await;
        serve_model(&server, "primary", 404).await;
        serve_model(&server, "secondary", 500).await;

        assert!(ChatSummarizer::load(&summarizer_config(&server)).await.is_err());
    }

    #[tokio::test]
    async fn test_load_without_key_fails() {
        let server = MockServer::start().await;
        let mut config = summarizer_config(&server);
        config.api_key = None;
        assert!(ChatSummarizer::load(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_summarize_uses_greedy_bounded_decoding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "primary",
                "temperature": 0.0,
                "max_tokens": 80,
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  A concise summary.  "}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&format!("{}/openai/v1", server.uri()), "k".to_string()).unwrap();
        let summarizer = ChatSummarizer::new(api, "primary".to_string());
        let summary = summarizer
            .summarize("An abstract.", &DecodingBounds::default())
            .await
            .unwrap();

        assert_eq!(summary, "A concise summary.");
    }

    #[tokio::test]
    async fn test_summarize_without_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let api = ApiClient::new(&format!("{}/openai/v1", server.uri()), "k".to_string()).unwrap();
        let summarizer = ChatSummarizer::new(api, "primary".to_string());
        assert!(
            summarizer
                .summarize("An abstract.", &DecodingBounds::default())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_instruction_carries_bounds() {
        let instruction = ChatSummarizer::instruction(&DecodingBounds::default());
        assert!(instruction.contains("20"));
        assert!(instruction.contains("80"));
    }
}
