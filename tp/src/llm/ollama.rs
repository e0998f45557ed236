//! Ollama client for the locally served model
//!
//! Talks to `/api/generate` with streaming disabled and a bounded wait.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage};
use crate::config::LocalConfig;

/// Ollama `/api/generate` client
pub struct OllamaClient {
    model: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

impl OllamaClient {
    pub fn from_config(config: &LocalConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "OllamaClient::from_config: called");
        let timeout = config.timeout();
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    /// Pull the generated text out of a 200 response body
    ///
    /// A body without a string `response` field is reported with the body
    /// attached so the user can see what the service actually sent.
    fn parse_body(model: String, body: &str) -> Result<CompletionResponse, LlmError> {
        debug!(body_len = body.len(), "OllamaClient::parse_body: called");
        let value: serde_json::Value = serde_json::from_str(body)?;

        let Some(content) = value.get("response").and_then(|r| r.as_str()) else {
            debug!("OllamaClient::parse_body: response field missing");
            return Err(LlmError::InvalidResponse(value.to_string()));
        };

        let usage = TokenUsage {
            input_tokens: value.get("prompt_eval_count").and_then(|v| v.as_u64()).unwrap_or(0),
            output_tokens: value.get("eval_count").and_then(|v| v.as_u64()).unwrap_or(0),
        };

        Ok(CompletionResponse {
            content: content.to_string(),
            model,
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        debug!(%model, prompt_len = request.prompt.len(), "OllamaClient::complete: called");

        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &model,
            prompt: &request.prompt,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout))?;

        if status != 200 {
            debug!(%status, "OllamaClient::complete: non-200 status");
            return Err(LlmError::ApiError { status, message: text });
        }

        let completion = Self::parse_body(model, &text)?;
        info!(
            model = %completion.model,
            output_tokens = completion.usage.output_tokens,
            "OllamaClient::complete: local generation received"
        );
        Ok(completion)
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client(base_url: &str) -> OllamaClient {
        OllamaClient::from_config(&LocalConfig {
            base_url: base_url.to_string(),
            timeout_ms: 5_000,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let client = test_client("http://localhost:11434/");
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.default_model(), "llama3.2");
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body(json!({"model": "llama3.2", "prompt": "Rome in 3 days", "stream": false}));
                then.status(200)
                    .json_body(json!({"model": "llama3.2", "response": "Day 1: Colosseum", "done": true, "eval_count": 7}));
            })
            .await;

        let client = test_client(&server.base_url());
        let resp = client.complete(CompletionRequest::new("Rome in 3 days")).await.unwrap();

        assert_eq!(resp.content, "Day 1: Colosseum");
        assert_eq!(resp.usage.output_tokens, 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_model_override() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(r#"{"model": "mistral"}"#);
                then.status(200).json_body(json!({"response": "ok"}));
            })
            .await;

        let client = test_client(&server.base_url());
        let resp = client
            .complete(CompletionRequest::new("x").with_model(Some("mistral")))
            .await
            .unwrap();
        assert_eq!(resp.model, "mistral");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("model not loaded");
            })
            .await;

        let client = test_client(&server.base_url());
        let err = client.complete(CompletionRequest::new("x")).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Status code 500, model not loaded");
    }

    #[tokio::test]
    async fn test_complete_missing_response_field() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({"error": "weird"}));
            })
            .await;

        let client = test_client(&server.base_url());
        let err = client.complete(CompletionRequest::new("x")).await.unwrap_err();

        match err {
            LlmError::InvalidResponse(body) => assert!(body.contains("weird")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_unreachable_service() {
        // Nothing listens on port 9 on a test host
        let client = test_client("http://127.0.0.1:9");
        let err = client.complete(CompletionRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, LlmError::Network(_) | LlmError::Timeout(_)));
    }
}
