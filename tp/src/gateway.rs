//! Model gateway
//!
//! Routes prompts to one of the two backends and converts every backend
//! failure into a [`BackendFailure`] value. Nothing here returns `Err` to the
//! caller; a failed call is an outcome like any other.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::llm::{self, CompletionRequest, LlmClient, LlmError};

/// One of the two text-generation services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Hosted chat-completions API
    #[default]
    Hosted,
    /// Locally served model
    Local,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Hosted, Backend::Local];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Hosted => "hosted",
            Backend::Local => "local",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hosted" | "openai" => Ok(Backend::Hosted),
            "local" | "llama" | "ollama" => Ok(Backend::Local),
            other => Err(format!("unknown backend '{}' (expected hosted or local)", other)),
        }
    }
}

/// Broad class of a backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingCredentials,
    Network,
    Timeout,
    Status(u16),
    InvalidResponse,
}

/// A backend call that did not produce a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.detail)
    }
}

impl From<LlmError> for BackendFailure {
    fn from(err: LlmError) -> Self {
        let kind = match &err {
            LlmError::MissingApiKey { .. } => FailureKind::MissingCredentials,
            LlmError::ApiError { status, .. } => FailureKind::Status(*status),
            LlmError::Network(_) => FailureKind::Network,
            LlmError::Timeout(_) => FailureKind::Timeout,
            LlmError::InvalidResponse(_) | LlmError::Json(_) => FailureKind::InvalidResponse,
        };
        Self {
            kind,
            detail: err.to_string(),
        }
    }
}

/// Result of one backend call: plan text or a failure description
pub type PlanOutcome = Result<String, BackendFailure>;

/// Current plans, keyed by the backend that produced them
pub type PlanSet = BTreeMap<Backend, PlanOutcome>;

/// Text shown to the user for an outcome
pub fn render_outcome(outcome: &PlanOutcome) -> String {
    match outcome {
        Ok(text) => text.clone(),
        Err(failure) => failure.to_string(),
    }
}

/// Both backend clients plus their display labels
#[derive(Clone)]
pub struct Gateway {
    hosted: Arc<dyn LlmClient>,
    local: Arc<dyn LlmClient>,
    hosted_label: String,
    local_label: String,
}

impl Gateway {
    pub fn new(hosted: Arc<dyn LlmClient>, local: Arc<dyn LlmClient>) -> Self {
        Self {
            hosted,
            local,
            hosted_label: "OpenAI".to_string(),
            local_label: "Llama 3.2".to_string(),
        }
    }

    pub fn with_labels(mut self, hosted: impl Into<String>, local: impl Into<String>) -> Self {
        self.hosted_label = hosted.into();
        self.local_label = local.into();
        self
    }

    /// Build both clients from configuration
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        debug!("Gateway::from_config: called");
        let hosted = llm::create_hosted_client(&config.hosted)?;
        let local = llm::create_local_client(&config.local)?;
        Ok(Self::new(hosted, local).with_labels(&config.hosted.label, &config.local.label))
    }

    pub fn label(&self, backend: Backend) -> &str {
        match backend {
            Backend::Hosted => &self.hosted_label,
            Backend::Local => &self.local_label,
        }
    }

    fn client(&self, backend: Backend) -> &Arc<dyn LlmClient> {
        match backend {
            Backend::Hosted => &self.hosted,
            Backend::Local => &self.local,
        }
    }

    /// Model a backend uses when no override is given
    pub fn default_model(&self, backend: Backend) -> &str {
        self.client(backend).default_model()
    }

    /// Send a prompt to one backend
    pub async fn generate(&self, backend: Backend, prompt: &str, model: Option<&str>) -> PlanOutcome {
        debug!(%backend, prompt_len = prompt.len(), ?model, "Gateway::generate: called");
        let request = CompletionRequest::new(prompt).with_model(model);

        match self.client(backend).complete(request).await {
            Ok(response) => {
                info!(%backend, model = %response.model, chars = response.content.len(), "Gateway::generate: plan received");
                Ok(response.content)
            }
            Err(e) => {
                warn!(%backend, error = %e, "Gateway::generate: backend call failed");
                Err(BackendFailure::from(e))
            }
        }
    }

    /// Send the same prompt to both backends concurrently
    ///
    /// Always returns one entry per backend, whether or not each call succeeded.
    pub async fn compare(&self, prompt: &str) -> PlanSet {
        debug!(prompt_len = prompt.len(), "Gateway::compare: called");
        let (hosted, local) = tokio::join!(
            self.generate(Backend::Hosted, prompt, None),
            self.generate(Backend::Local, prompt, None)
        );

        PlanSet::from([(Backend::Hosted, hosted), (Backend::Local, local)])
    }
}
