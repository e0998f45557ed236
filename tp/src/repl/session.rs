//! REPL session management

use std::fs;
use std::path::Path;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use super::commands::{SlashCommand, parse_slash};
use crate::gateway::{Backend, render_outcome};
use crate::session::{Phase, SessionController, SessionState};

/// How the user wants plans generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single(Backend),
    Compare,
}

/// Parse the answer to the generation menu; blank picks the hosted backend
pub fn parse_selection(input: &str) -> Option<Selection> {
    match input.trim().to_lowercase().as_str() {
        "" | "1" | "h" => Some(Selection::Single(Backend::Hosted)),
        "2" | "l" => Some(Selection::Single(Backend::Local)),
        "3" | "c" | "compare" | "both" => Some(Selection::Compare),
        other => other.parse::<Backend>().ok().map(Selection::Single),
    }
}

/// Interactive REPL session
pub struct ReplSession {
    controller: SessionController,
    state: SessionState,
    /// Stage index last drawn, so screens are printed once per step
    rendered: Option<usize>,
}

impl ReplSession {
    pub fn new(controller: SessionController) -> Self {
        Self {
            controller,
            state: SessionState::default(),
            rendered: None,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            if self.rendered != Some(self.state.stage_index) {
                self.render();
                self.rendered = Some(self.state.stage_index);
            }

            let phase = self.controller.phase(&self.state);
            let prefill = self.previous_answer().unwrap_or_default();
            let readline = rl.readline_with_initial(&self.prompt_marker(phase), (prefill.as_str(), ""));

            let line = match readline {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            };

            let input = line.trim();
            if input.starts_with('/') {
                let _ = rl.add_history_entry(input);
                match self.handle_slash_command(input) {
                    SlashResult::Continue => continue,
                    SlashResult::Quit => break,
                }
            }

            match phase {
                Phase::Collecting => self.answer(input),
                Phase::Selecting => self.select(input).await,
                Phase::Reviewing => {
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);
                    self.refine(input).await;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn prompt_marker(&self, phase: Phase) -> String {
        match phase {
            Phase::Collecting => format!("{} ", ">".bright_green()),
            Phase::Selecting => format!("{} ", "choice>".bright_green()),
            Phase::Reviewing => format!("{} ", "refine>".bright_green()),
        }
    }

    fn previous_answer(&self) -> Option<String> {
        let stage = self.controller.current_stage(&self.state)?;
        self.state.answers.get(stage.name).cloned()
    }

    fn answer(&mut self, input: &str) {
        let Some(stage) = self.controller.current_stage(&self.state) else {
            return;
        };
        let name = stage.name;
        if let Err(e) = self.controller.record_answer(&mut self.state, name, input) {
            println!("{} {}", "!".red(), e);
        }
    }

    async fn select(&mut self, input: &str) {
        let Some(selection) = parse_selection(input) else {
            println!("{} Pick 1, 2 or 3", "?".yellow());
            return;
        };
        debug!(?selection, "select: called");

        let applied = match selection {
            Selection::Single(backend) => self
                .controller
                .set_comparison(&mut self.state, false)
                .and_then(|_| self.controller.select_backend(&mut self.state, backend)),
            Selection::Compare => self.controller.set_comparison(&mut self.state, true),
        };
        if let Err(e) = applied {
            println!("{} {}", "!".red(), e);
            return;
        }

        println!();
        println!("{}", "Creating your personalized travel itinerary...".dimmed());
        if let Err(e) = self.controller.generate(&mut self.state).await {
            println!("{} {}", "!".red(), e);
        }
    }

    async fn refine(&mut self, instruction: &str) {
        println!("{}", "Refining your travel plan...".dimmed());
        match self.controller.refine(&mut self.state, instruction).await {
            Ok(()) => self.print_plans(),
            Err(e) => println!("{} {}", "!".red(), e),
        }
    }

    /// Draw the screen for the current step
    fn render(&self) {
        match self.controller.phase(&self.state) {
            Phase::Collecting => self.print_stage(),
            Phase::Selecting => {
                self.print_summary();
                self.print_selection_menu();
            }
            Phase::Reviewing => self.print_plans(),
        }
    }

    fn print_stage(&self) {
        let Some(stage) = self.controller.current_stage(&self.state) else {
            return;
        };

        println!();
        if stage.is_introduction() {
            println!("{}", "TravelPlanner".bright_cyan().bold());
            println!("{}", stage.prompt);
            println!();
            println!(
                "Press {} to begin, {} for help, {} to quit",
                "Enter".yellow(),
                "/help".yellow(),
                "/quit".yellow()
            );
            return;
        }

        // The introduction is not counted as a question
        let questions = self.controller.stage_count() - 1;
        println!(
            "{} {}",
            format!("Step {} of {}", self.state.stage_index, questions).dimmed(),
            format!("[{}%]", self.controller.progress_percent(&self.state)).dimmed()
        );
        println!("{}", stage.title().bright_cyan().bold());
        println!("{}", stage.prompt);
        if stage.required {
            println!("{}", "(required)".yellow());
        } else {
            println!("{}", "Press Enter to skip".dimmed());
        }
        if stage.example.is_some() {
            println!("{}", "Type /example for a sample answer".dimmed());
        }
    }

    fn print_summary(&self) {
        let summary = self.controller.answer_summary(&self.state);
        println!();
        println!("{}", "Your Travel Details:".bright_cyan());
        if summary.is_empty() {
            println!("{}", "  No answers yet.".dimmed());
        }
        for section in summary {
            println!("  {}: {}", section.heading.yellow(), section.answer);
        }
        println!();
    }

    fn print_selection_menu(&self) {
        let gateway = self.controller.gateway();
        println!("{}", "How should the plan be generated?".bright_cyan());
        println!("  {:14} {}", "1".yellow(), gateway.label(Backend::Hosted));
        println!("  {:14} {}", "2".yellow(), gateway.label(Backend::Local));
        println!("  {:14} Compare both side by side", "3".yellow());
        println!("{}", "Press Enter for 1, or /back to edit your answers".dimmed());
    }

    fn print_plans(&self) {
        let gateway = self.controller.gateway();
        for (backend, outcome) in &self.state.plans {
            println!();
            println!("{}", format!("{} Plan", gateway.label(*backend)).bright_cyan().bold());
            match outcome {
                Ok(text) => println!("{}", text),
                Err(_) => println!("{}", render_outcome(outcome).red()),
            }
        }

        println!();
        if self.state.comparison_mode {
            println!(
                "Type a change to refine both plans, or {} to keep one",
                "/choose <hosted|local>".yellow()
            );
        } else {
            println!(
                "Type a change to refine the plan, {} to save it, {} to start over",
                "/export [path]".yellow(),
                "/reset".yellow()
            );
        }
    }

    /// Handle a slash command
    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        match parse_slash(input) {
            SlashCommand::Help => self.print_help(),
            SlashCommand::Quit => return SlashResult::Quit,
            SlashCommand::Back => self.go_back(),
            SlashCommand::Example => self.print_example(),
            SlashCommand::Summary => self.print_summary(),
            SlashCommand::Reset => {
                self.controller.reset(&mut self.state);
                self.rendered = None;
                println!("{}", "Starting a new plan.".dimmed());
            }
            SlashCommand::Choose(backend) => match self.controller.choose_plan(&mut self.state, backend) {
                Ok(()) => self.print_plans(),
                Err(e) => println!("{} {}", "!".red(), e),
            },
            SlashCommand::Export(path) => self.export(&path),
            SlashCommand::Invalid(msg) => println!("{} {}", "?".yellow(), msg),
            SlashCommand::Unknown(cmd) => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        SlashResult::Continue
    }

    fn go_back(&mut self) {
        match self.controller.phase(&self.state) {
            Phase::Collecting if self.state.stage_index <= 1 => {
                println!("{}", "Already at the first question.".dimmed());
            }
            Phase::Reviewing => {
                println!("Use {} to start a new plan", "/reset".yellow());
            }
            _ => self.controller.retreat(&mut self.state),
        }
    }

    fn print_example(&self) {
        match self.controller.current_stage(&self.state).and_then(|s| s.example) {
            Some(example) => println!("{} {}", "Example:".yellow(), example),
            None => println!("{}", "No example for this step.".dimmed()),
        }
    }

    fn export(&self, path: &Path) {
        let text = match self.controller.export_plan(&self.state) {
            Ok(text) => text,
            Err(e) => {
                println!("{} {}", "!".red(), e);
                return;
            }
        };

        match fs::write(path, text) {
            Ok(()) => {
                info!(path = %path.display(), "export: plan written");
                println!("Plan saved to {}", path.display().to_string().bright_white());
            }
            Err(e) => println!("{} Failed to write {}: {}", "!".red(), path.display(), e),
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit the REPL", "/quit".yellow());
        println!("  {:14} Go to the previous question", "/back".yellow());
        println!("  {:14} Show a sample answer", "/example".yellow());
        println!("  {:14} Show your answers so far", "/summary".yellow());
        println!("  {:14} Keep one of two compared plans", "/choose".yellow());
        println!("  {:14} Save the plan (default travel_plan.txt)", "/export".yellow());
        println!("  {:14} Start a new plan", "/reset".yellow());
        println!();
        println!("While reviewing a plan, any other line is sent as a change request.");
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
