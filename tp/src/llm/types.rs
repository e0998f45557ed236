//! LLM request/response types for TravelPlanner
//!
//! Both backends take a single free-text prompt and return free text, so the
//! types stay far smaller than a full chat API.

use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The full prompt, sent as a single user turn
    pub prompt: String,

    /// Model name override; `None` uses the client's configured model
    pub model: Option<String>,
}

impl CompletionRequest {
    /// Create a request using the client's configured model
    pub fn new(prompt: impl Into<String>) -> Self {
        debug!("CompletionRequest::new: called");
        Self {
            prompt: prompt.into(),
            model: None,
        }
    }

    /// Override the model for this call only
    pub fn with_model(mut self, model: Option<impl Into<String>>) -> Self {
        self.model = model.map(Into::into);
        self
    }
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,

    /// Model that produced the text
    pub model: String,

    /// Token usage, when the backend reports it
    pub usage: TokenUsage,
}

/// Token usage reported by a backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_configured_model() {
        let req = CompletionRequest::new("plan a trip");
        assert_eq!(req.prompt, "plan a trip");
        assert!(req.model.is_none());
    }

    #[test]
    fn test_request_model_override() {
        let req = CompletionRequest::new("x").with_model(Some("llama3.1"));
        assert_eq!(req.model.as_deref(), Some("llama3.1"));

        let req = CompletionRequest::new("x").with_model(None::<String>);
        assert!(req.model.is_none());
    }
}
