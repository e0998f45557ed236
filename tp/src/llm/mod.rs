//! LLM Client module for TravelPlanner
//!
//! One client per backend behind the [`LlmClient`] trait: the hosted
//! chat-completions API and a locally served Ollama model.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod ollama;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, TokenUsage};

use crate::config::{HostedConfig, LocalConfig};

/// Create the hosted backend client
pub fn create_hosted_client(config: &HostedConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(model = %config.model, "create_hosted_client: called");
    Ok(Arc::new(OpenAIClient::from_config(config)?))
}

/// Create the local backend client
pub fn create_local_client(config: &LocalConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(model = %config.model, "create_local_client: called");
    Ok(Arc::new(OllamaClient::from_config(config)?))
}
