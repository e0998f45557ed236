//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API. The
//! prompt is sent as a single user message; no retries are attempted.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage};
use crate::config::HostedConfig;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new client from the hosted backend configuration
    ///
    /// A missing API key is not an error here: every call then fails with
    /// [`LlmError::MissingApiKey`] so the local backend stays usable.
    pub fn from_config(config: &HostedConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let timeout = config.timeout();

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key(),
            api_key_env: config.api_key_env.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout,
        })
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, model: &str, request: &CompletionRequest) -> serde_json::Value {
        debug!(%model, "build_request_body: called");

        // GPT-5.x and o1/o3 models use max_completion_tokens instead of max_tokens
        let uses_completion_tokens = model.starts_with("gpt-5") || model.starts_with("o1") || model.starts_with("o3");

        let mut body = serde_json::json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": request.prompt,
            }],
            "temperature": self.temperature,
        });

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(self.max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(self.max_tokens);
        }

        body
    }

    /// Parse the OpenAI API response
    fn parse_response(&self, model: String, api_response: OpenAIResponse) -> Result<CompletionResponse, LlmError> {
        debug!(choices = api_response.choices.len(), "parse_response: called");
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no message content in completion".to_string()))?;

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse { content, model, usage })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        debug!(%model, prompt_len = request.prompt.len(), "complete: called");

        let Some(api_key) = self.api_key.as_deref() else {
            debug!("complete: no API key configured");
            return Err(LlmError::MissingApiKey {
                env: self.api_key_env.clone(),
            });
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&model, &request);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout))?;
        let api_response: OpenAIResponse = serde_json::from_str(&text)?;
        let completion = self.parse_response(model, api_response)?;
        info!(
            model = %completion.model,
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "complete: hosted completion received"
        );
        Ok(completion)
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
