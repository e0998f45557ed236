//! TravelPlanner - conversational trip planning
//!
//! A user answers a short questionnaire about an upcoming trip; the answers
//! become one prompt that is sent to a hosted chat model, a local Ollama
//! model, or both side by side. The resulting plans can then be refined with
//! free-text change requests and exported.
//!
//! # Modules
//!
//! - [`stages`] - The fixed intake questionnaire
//! - [`prompts`] - Template loading and travel prompt assembly
//! - [`llm`] - LLM client trait plus OpenAI and Ollama implementations
//! - [`gateway`] - Backend routing and failure capture
//! - [`refine`] - Follow-up prompts for plan revisions
//! - [`session`] - Session state machine
//! - [`repl`] - Interactive terminal front end
//! - [`probe`] - Sample prompts for checking both backends
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod probe;
pub mod prompts;
pub mod refine;
pub mod repl;
pub mod session;
pub mod stages;

// Re-export commonly used types
pub use config::{Config, HostedConfig, LocalConfig};
pub use gateway::{Backend, BackendFailure, FailureKind, Gateway, PlanOutcome, PlanSet, render_outcome};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OllamaClient, OpenAIClient};
pub use prompts::{PromptLoader, build_travel_prompt};
pub use session::{Phase, SessionController, SessionError, SessionState};
pub use stages::{AnswerSet, Stage, default_stages};
