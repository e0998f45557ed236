//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (user override, from config)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

mod builder;
pub mod embedded;
mod loader;

pub use builder::{PromptSection, build_travel_prompt, normalize_whitespace, prompt_sections};
pub use loader::PromptLoader;
