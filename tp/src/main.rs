//! TravelPlanner - conversational trip planning
//!
//! CLI entry point for the interactive planner, one-shot plans and the
//! backend probe.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use travelplanner::cli::{Cli, Command, generate_after_help};
use travelplanner::config::Config;
use travelplanner::gateway::{Backend, Gateway, PlanSet, render_outcome};
use travelplanner::probe::{format_report, run_probe};
use travelplanner::repl::{build_controller, run_interactive};
use travelplanner::session::SessionState;
use travelplanner::stages::AnswerSet;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("travelplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help that shows backend status
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        hosted = %config.hosted.model,
        local = %config.local.model,
        "TravelPlanner loaded config"
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Chat) | None => {
            debug!("main: launching interactive planner");
            run_interactive(&config).await
        }
        Some(Command::Plan {
            answers,
            compare,
            backend,
            output,
        }) => {
            debug!(?answers, compare, %backend, ?output, "main: matched Plan command");
            cmd_plan(&config, &answers, compare, backend, output.as_deref()).await
        }
        Some(Command::Probe { compare_only }) => {
            debug!(compare_only, "main: matched Probe command");
            cmd_probe(&config, compare_only).await
        }
    }
}

fn load_answers(path: &Path) -> Result<AnswerSet> {
    debug!(?path, "load_answers: called");
    let content = fs::read_to_string(path).context(format!("Failed to read answers from {}", path.display()))?;
    let answers: AnswerSet =
        serde_yaml::from_str(&content).context(format!("Failed to parse answers in {}", path.display()))?;
    Ok(answers)
}

/// Generate a plan without the interactive loop
async fn cmd_plan(
    config: &Config,
    answers_path: &Path,
    compare: bool,
    backend: Backend,
    output: Option<&Path>,
) -> Result<()> {
    debug!(?answers_path, compare, %backend, "cmd_plan: called");
    let answers = load_answers(answers_path)?;
    let controller = build_controller(config)?;

    for key in answers.keys() {
        if !controller.stages().iter().any(|s| s.name == key.as_str()) {
            warn!(%key, "cmd_plan: ignoring answer for unknown stage");
            eprintln!("Warning: ignoring unknown question '{}'", key);
        }
    }

    let mut state = SessionState::default();
    controller.collect_answers(&mut state, &answers)?;
    controller.set_comparison(&mut state, compare)?;
    controller.select_backend(&mut state, backend)?;

    eprintln!("Creating your personalized travel itinerary...");
    controller.generate(&mut state).await?;

    let text = if compare {
        format_plans(controller.gateway(), &state.plans)
    } else {
        controller.export_plan(&state)?
    };

    match output {
        Some(path) => {
            fs::write(path, &text).context(format!("Failed to write plan to {}", path.display()))?;
            info!(path = %path.display(), "cmd_plan: plan written");
            eprintln!("Plan saved to {}", path.display());
        }
        None => println!("{}", text),
    }

    if state.plans.values().all(|outcome| outcome.is_err()) {
        return Err(eyre::eyre!("No backend produced a plan"));
    }
    Ok(())
}

/// Labeled plans, one after another
fn format_plans(gateway: &Gateway, plans: &PlanSet) -> String {
    plans
        .iter()
        .map(|(backend, outcome)| format!("===== {} Plan =====\n\n{}\n", gateway.label(*backend), render_outcome(outcome)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the sample prompts against both backends
async fn cmd_probe(config: &Config, compare_only: bool) -> Result<()> {
    debug!(compare_only, "cmd_probe: called");
    let gateway = Gateway::from_config(config).map_err(|e| eyre::eyre!("Failed to create LLM clients: {}", e))?;

    let results = run_probe(&gateway, compare_only).await;
    print!("{}", format_report(&gateway, &results));
    Ok(())
}
