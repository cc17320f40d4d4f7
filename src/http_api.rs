// file: src/http_api.rs
// description: OpenAI-compatible HTTP plumbing shared by the remote encoder and the summarizer
// reference: https://console.groq.com/docs/openai

use crate::error::{PipelineError, Result};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(api_base: &str, api_key: String) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Builds a client only when a non-blank key is configured.
    pub fn from_optional_key(api_base: &str, api_key: Option<&str>) -> Result<Self> {
        match api_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => Self::new(api_base, key.to_string()),
            None => Err(PipelineError::Config(format!(
                "no API key configured for {}",
                api_base
            ))),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// `GET /models/{model}`; succeeds when the provider serves the model.
    pub async fn check_model(&self, model: &str) -> Result<()> {
        let url = self.endpoint(&format!("models/{}", model));
        debug!("Probing model {} at {}", model, url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PipelineError::Config(format!(
                "model {} unavailable at {} (status {})",
                model,
                self.api_base,
                response.status()
            )));
        }

        Ok(())
    }

    /// POSTs `body` as JSON. Failures are reported through `wrap` so callers keep their own variant.
    pub async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        wrap: fn(String) -> PipelineError,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| wrap(format!("Failed to send request to {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(wrap(format!(
                "Request to {} failed with status {}: {}",
                url, status, error_text
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| wrap(format!("Failed to parse response from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Echo {
        ok: bool,
    }

    #[test]
    fn test_missing_key_is_config_error() {
        assert!(ApiClient::from_optional_key("https://api.example.com/v1", None).is_err());
        assert!(ApiClient::from_optional_key("https://api.example.com/v1", Some(" ")).is_err());
        assert!(ApiClient::from_optional_key("https://api.example.com/v1", Some("k")).is_ok());
    }

    #[tokio::test]
    async fn test_check_model_reports_unknown_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models/known"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/models/unknown"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/v1/", server.uri()), "secret".to_string()).unwrap();
        assert!(client.check_model("known").await.is_ok());
        assert!(client.check_model("unknown").await.is_err());
    }

    #[tokio::test]
    async fn test_post_json_wraps_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/fail"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/v1", server.uri()), "k".to_string()).unwrap();

        let echo: Echo = client
            .post_json("ok", &serde_json::json!({}), PipelineError::Summarization)
            .await
            .unwrap();
        assert!(echo.ok);

        let err = client
            .post_json::<_, Echo>("fail", &serde_json::json!({}), PipelineError::Summarization)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Summarization(msg) if msg.contains("slow down")));
    }
}
