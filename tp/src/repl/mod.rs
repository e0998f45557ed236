//! Interactive REPL for TravelPlanner
//!
//! Walks the user through the questionnaire, generates plans and takes
//! refinement requests, all from the terminal.

mod commands;
mod session;

pub use commands::{SlashCommand, parse_slash};
pub use session::ReplSession;

use eyre::Result;
use tracing::debug;

use crate::config::Config;
use crate::gateway::Gateway;
use crate::prompts::PromptLoader;
use crate::session::SessionController;
use crate::stages::default_stages;

/// Build a session controller from configuration
pub fn build_controller(config: &Config) -> Result<SessionController> {
    debug!("build_controller: called");
    let gateway = Gateway::from_config(config).map_err(|e| eyre::eyre!("Failed to create LLM clients: {}", e))?;
    let loader = PromptLoader::new(config.prompts_dir.as_deref());
    Ok(SessionController::new(default_stages(), gateway, loader))
}

/// Run the interactive REPL
///
/// This is the main entry point for `tp` and `tp chat`.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    let mut session = ReplSession::new(controller);
    session.run().await
}
