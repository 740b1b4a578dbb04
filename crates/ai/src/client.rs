//! Language model clients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::result::AiError;

/// Text-in, text-out language model boundary.
#[async_trait]
pub trait LlmClient: Send + Sync + 'static {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    /// Whole-request timeout (connect + generation).
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://ollama:11434".to_string(),
            model: "mistral".to_string(),
            timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Client for Ollama's non-streaming `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/generate", config.base_url.trim_end_matches('/')),
            model: config.model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        info!(url = %self.endpoint, model = %self.model, "sending request to ollama");

        let res = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        if res.status() != StatusCode::OK {
            return Err(AiError::UpstreamStatus(res.status().as_u16()));
        }

        let parsed: GenerateResponse = res.json().await.map_err(|e| AiError::Decode(e.to_string()))?;
        debug!(done = parsed.done, response_len = parsed.response.len(), "ollama responded");
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(OllamaConfig {
            base_url: format!("{}/", server.uri()),
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_non_streaming_generate_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({
                "model": "mistral",
                "prompt": "hello",
                "stream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "{\"title\": \"Soep\"}",
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.endpoint(), format!("{}/api/generate", server.uri()));
        let out = client.generate("hello").await.unwrap();
        assert_eq!(out, "{\"title\": \"Soep\"}");
    }

    #[tokio::test]
    async fn non_ok_status_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert_eq!(err, AiError::UpstreamStatus(503));
    }

    #[tokio::test]
    async fn unexpected_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::Transport(_)));
    }
}
