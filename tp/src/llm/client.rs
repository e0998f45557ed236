//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// Refinement works by embedding the previous plan in a new prompt, so no
/// conversation state is kept between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when a request carries no override
    fn default_model(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::llm::TokenUsage;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// A scripted reply for [`MockLlmClient`]
    #[derive(Debug, Clone)]
    pub enum MockReply {
        Text(String),
        Status(u16, String),
        Malformed(String),
    }

    impl MockReply {
        pub fn text(s: impl Into<String>) -> Self {
            MockReply::Text(s.into())
        }
    }

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        model: String,
        responses: Vec<MockReply>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<MockReply>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self {
                model: "mock-model".to_string(),
                responses,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Client that answers every call in order with the given texts
        pub fn texts(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| MockReply::text(*t)).collect())
        }

        pub fn call_count(&self) -> usize {
            debug!("MockLlmClient::call_count: called");
            self.call_count.load(Ordering::SeqCst)
        }

        /// Every request received so far, in call order
        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            debug!("MockLlmClient::complete: called");
            let model = request.model.clone().unwrap_or_else(|| self.model.clone());
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: fetching response");
            match self.responses.get(idx).cloned() {
                Some(MockReply::Text(content)) => Ok(CompletionResponse {
                    content,
                    model,
                    usage: TokenUsage::default(),
                }),
                Some(MockReply::Status(status, message)) => Err(LlmError::ApiError { status, message }),
                Some(MockReply::Malformed(body)) => Err(LlmError::InvalidResponse(body)),
                None => {
                    debug!("MockLlmClient::complete: no more mock responses");
                    Err(LlmError::InvalidResponse("No more mock responses".to_string()))
                }
            }
        }

        fn default_model(&self) -> &str {
            &self.model
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::texts(&["Response 1", "Response 2"]);

            let resp1 = client.complete(CompletionRequest::new("a")).await.unwrap();
            assert_eq!(resp1.content, "Response 1");
            assert_eq!(resp1.model, "mock-model");

            let resp2 = client
                .complete(CompletionRequest::new("b").with_model(Some("other")))
                .await
                .unwrap();
            assert_eq!(resp2.content, "Response 2");
            assert_eq!(resp2.model, "other");

            assert_eq!(client.call_count(), 2);
            let prompts: Vec<_> = client.requests().into_iter().map(|r| r.prompt).collect();
            assert_eq!(prompts, vec!["a", "b"]);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.complete(CompletionRequest::new("Test")).await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_mock_client_scripted_failure() {
            let client = MockLlmClient::new(vec![MockReply::Status(500, "boom".to_string())]);
            let err = client.complete(CompletionRequest::new("Test")).await.unwrap_err();
            assert_eq!(err.status(), Some(500));
        }
    }
}
