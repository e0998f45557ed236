//! Plan refinement
//!
//! A refinement is a fresh prompt that carries the previous plan and the
//! requested changes verbatim; the backend keeps no memory of the first call.

use eyre::Result;
use serde::Serialize;
use tracing::debug;

use crate::gateway::{Backend, Gateway, PlanOutcome};
use crate::prompts::PromptLoader;

#[derive(Debug, Serialize)]
struct RefineContext<'a> {
    previous_plan: &'a str,
    instruction: &'a str,
}

/// Render the follow-up prompt for a plan and a change request
pub fn refinement_prompt(loader: &PromptLoader, previous_plan: &str, instruction: &str) -> Result<String> {
    debug!(
        previous_len = previous_plan.len(),
        instruction_len = instruction.len(),
        "refinement_prompt: called"
    );
    loader.render(
        "refine",
        &RefineContext {
            previous_plan,
            instruction,
        },
    )
}

/// Ask one backend for a revised plan
///
/// Exactly one gateway call per invocation; there is no retry.
pub async fn refine_plan(
    gateway: &Gateway,
    loader: &PromptLoader,
    backend: Backend,
    previous_plan: &str,
    instruction: &str,
) -> Result<PlanOutcome> {
    debug!(%backend, "refine_plan: called");
    let prompt = refinement_prompt(loader, previous_plan, instruction)?;
    Ok(gateway.generate(backend, &prompt, None).await)
}
