//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{HostedConfig, LocalConfig};
use crate::gateway::Backend;

/// TravelPlanner - conversational trip planning
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Plan a trip by answering a few questions, then refine the itinerary",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive planner (default)
    Chat,

    /// Generate a plan from a YAML file of answers
    Plan {
        /// YAML map of stage name to answer
        #[arg(short, long, value_name = "FILE")]
        answers: PathBuf,

        /// Ask both backends and show the plans side by side
        #[arg(long, conflicts_with = "backend")]
        compare: bool,

        /// Backend to use (hosted, local)
        #[arg(short, long, default_value = "hosted")]
        backend: Backend,

        /// Write the plan to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Send sample travel prompts to both backends
    Probe {
        /// Only run the family trip comparison prompt
        #[arg(long)]
        compare_only: bool,
    },
}

/// Get the path to the log file
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelplanner")
        .join("logs")
        .join("travelplanner.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with credential status and log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let hosted = HostedConfig::default();

    let mut help = String::new();
    help.push_str("Backends:\n");
    let icon = if hosted.api_key().is_some() {
        debug!("generate_after_help: api key present");
        "\u{2705}"
    } else {
        debug!("generate_after_help: api key missing");
        "\u{274C}"
    };
    help.push_str(&format!("  {} {:<10} {}\n", icon, "hosted", hosted.api_key_env));
    help.push_str(&format!("     {:<10} {}\n", "local", LocalConfig::default().base_url));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));

    debug!("generate_after_help: returning help text");
    help
}
