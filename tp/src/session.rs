//! Session controller
//!
//! A session moves through three phases, driven entirely by `stage_index`:
//!
//! - `Collecting` while `stage_index < stage_count`
//! - `Selecting` when `stage_index == stage_count`
//! - `Reviewing` once `stage_index > stage_count`
//!
//! All mutable progress lives in [`SessionState`]; the [`SessionController`]
//! owns the stage catalog, the gateway and the prompt loader, and every
//! operation takes the state explicitly.

use std::fmt;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info};

use crate::gateway::{Backend, Gateway, PlanSet, render_outcome};
use crate::prompts::{PromptLoader, PromptSection, build_travel_prompt, prompt_sections};
use crate::refine::refine_plan;
use crate::stages::{AnswerSet, Stage};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Selecting,
    Reviewing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Collecting => "collecting",
            Phase::Selecting => "selecting",
            Phase::Reviewing => "reviewing",
        };
        f.write_str(name)
    }
}

/// Mutable progress of one planning session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub stage_index: usize,
    pub answers: AnswerSet,
    pub plans: PlanSet,
    pub comparison_mode: bool,
    pub selected_backend: Backend,
}

/// Rejected session operations; the state is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{stage} is required to continue")]
    MissingAnswer { stage: String },

    #[error("expected an answer for {expected}, got one for {got}")]
    StageMismatch { expected: String, got: String },

    #[error("cannot {operation} while {phase}")]
    WrongPhase { operation: &'static str, phase: Phase },

    #[error("describe what you would like to change")]
    EmptyInstruction,

    #[error("choose one of the compared plans first")]
    ComparisonActive,

    #[error("not comparing plans")]
    NotComparing,

    #[error("no plan available from the {0} backend")]
    PlanNotAvailable(Backend),

    #[error("failed to build prompt: {0}")]
    Prompt(String),
}

/// Drives a [`SessionState`] through collection, selection and review
pub struct SessionController {
    stages: Vec<Stage>,
    gateway: Gateway,
    loader: PromptLoader,
}

impl SessionController {
    pub fn new(stages: Vec<Stage>, gateway: Gateway, loader: PromptLoader) -> Self {
        debug!(stage_count = stages.len(), "SessionController::new: called");
        Self {
            stages,
            gateway,
            loader,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn phase(&self, state: &SessionState) -> Phase {
        let count = self.stage_count();
        match state.stage_index {
            i if i < count => Phase::Collecting,
            i if i == count => Phase::Selecting,
            _ => Phase::Reviewing,
        }
    }

    /// Stage being asked, while collecting
    pub fn current_stage(&self, state: &SessionState) -> Option<&Stage> {
        self.stages.get(state.stage_index)
    }

    /// Share of the questionnaire already answered, 0-100
    pub fn progress_percent(&self, state: &SessionState) -> u8 {
        let count = self.stage_count();
        if count == 0 {
            return 100;
        }
        (state.stage_index.min(count) * 100 / count) as u8
    }

    /// Answered stages as heading/answer pairs, in catalog order
    pub fn answer_summary(&self, state: &SessionState) -> Vec<PromptSection> {
        prompt_sections(&self.stages, &state.answers)
    }

    pub fn advance(&self, state: &mut SessionState) {
        state.stage_index += 1;
        debug!(stage_index = state.stage_index, "advance: called");
    }

    pub fn retreat(&self, state: &mut SessionState) {
        state.stage_index = state.stage_index.saturating_sub(1);
        debug!(stage_index = state.stage_index, "retreat: called");
    }

    /// Store the answer for the current stage and move on
    ///
    /// Blank answers to optional stages clear any earlier answer.
    pub fn record_answer(&self, state: &mut SessionState, stage_name: &str, text: &str) -> Result<(), SessionError> {
        debug!(%stage_name, text_len = text.len(), "record_answer: called");
        self.require_phase(state, Phase::Collecting, "record an answer")?;

        let stage = self.current_stage(state).ok_or(SessionError::WrongPhase {
            operation: "record an answer",
            phase: self.phase(state),
        })?;
        if stage.name != stage_name {
            return Err(SessionError::StageMismatch {
                expected: stage.name.to_string(),
                got: stage_name.to_string(),
            });
        }

        let text = text.trim();
        if text.is_empty() {
            if stage.required {
                debug!(%stage_name, "record_answer: required answer missing");
                return Err(SessionError::MissingAnswer { stage: stage.title() });
            }
            state.answers.remove(stage_name);
        } else {
            state.answers.insert(stage_name.to_string(), text.to_string());
        }

        self.advance(state);
        Ok(())
    }

    /// Answer every remaining stage from a prepared answer set
    ///
    /// Stops at the first rejected answer, leaving the session on that stage.
    pub fn collect_answers(&self, state: &mut SessionState, answers: &AnswerSet) -> Result<(), SessionError> {
        debug!(answer_count = answers.len(), "collect_answers: called");
        while let Some(stage) = self.current_stage(state) {
            let text = answers.get(stage.name).map(String::as_str).unwrap_or("");
            self.record_answer(state, stage.name, text)?;
        }
        Ok(())
    }

    pub fn set_comparison(&self, state: &mut SessionState, enabled: bool) -> Result<(), SessionError> {
        debug!(%enabled, "set_comparison: called");
        self.require_phase(state, Phase::Selecting, "change comparison mode")?;
        state.comparison_mode = enabled;
        Ok(())
    }

    pub fn select_backend(&self, state: &mut SessionState, backend: Backend) -> Result<(), SessionError> {
        debug!(%backend, "select_backend: called");
        self.require_phase(state, Phase::Selecting, "select a backend")?;
        state.selected_backend = backend;
        Ok(())
    }

    /// Build the itinerary prompt from the collected answers
    pub fn travel_prompt(&self, state: &SessionState) -> Result<String, SessionError> {
        build_travel_prompt(&self.loader, &self.stages, &state.answers).map_err(|e| SessionError::Prompt(e.to_string()))
    }

    /// Generate plan(s) from the collected answers and move to review
    pub async fn generate(&self, state: &mut SessionState) -> Result<(), SessionError> {
        debug!(comparison_mode = state.comparison_mode, backend = %state.selected_backend, "generate: called");
        self.require_phase(state, Phase::Selecting, "generate a plan")?;

        let prompt = self.travel_prompt(state)?;
        let plans = if state.comparison_mode {
            self.gateway.compare(&prompt).await
        } else {
            let backend = state.selected_backend;
            let outcome = self.gateway.generate(backend, &prompt, None).await;
            PlanSet::from([(backend, outcome)])
        };

        info!(plan_count = plans.len(), "generate: plans ready");
        state.plans = plans;
        self.advance(state);
        Ok(())
    }

    /// Revise every current plan with the same instruction
    ///
    /// One backend call per plan, run concurrently; the plan set is replaced
    /// only after all of them finish. A failed plan is refined from its
    /// rendered error text.
    pub async fn refine(&self, state: &mut SessionState, instruction: &str) -> Result<(), SessionError> {
        debug!(instruction_len = instruction.len(), "refine: called");
        self.require_phase(state, Phase::Reviewing, "refine a plan")?;

        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(SessionError::EmptyInstruction);
        }

        let results = join_all(state.plans.iter().map(|(backend, outcome)| {
            let previous = render_outcome(outcome);
            async move {
                refine_plan(&self.gateway, &self.loader, *backend, &previous, instruction)
                    .await
                    .map(|revised| (*backend, revised))
            }
        }))
        .await;
        let outcomes = results
            .into_iter()
            .collect::<eyre::Result<PlanSet>>()
            .map_err(|e| SessionError::Prompt(e.to_string()))?;

        info!(plan_count = outcomes.len(), "refine: plans revised");
        state.plans = outcomes;
        Ok(())
    }

    /// Keep one of the compared plans and leave comparison mode
    pub fn choose_plan(&self, state: &mut SessionState, backend: Backend) -> Result<(), SessionError> {
        debug!(%backend, "choose_plan: called");
        self.require_phase(state, Phase::Reviewing, "choose a plan")?;
        if !state.comparison_mode {
            return Err(SessionError::NotComparing);
        }

        let outcome = state
            .plans
            .get(&backend)
            .cloned()
            .ok_or(SessionError::PlanNotAvailable(backend))?;
        state.plans = PlanSet::from([(backend, outcome)]);
        state.comparison_mode = false;
        state.selected_backend = backend;
        Ok(())
    }

    /// Plain text of the single selected plan
    pub fn export_plan(&self, state: &SessionState) -> Result<String, SessionError> {
        debug!("export_plan: called");
        self.require_phase(state, Phase::Reviewing, "export a plan")?;
        if state.comparison_mode {
            return Err(SessionError::ComparisonActive);
        }
        state
            .plans
            .values()
            .next()
            .map(render_outcome)
            .ok_or(SessionError::PlanNotAvailable(state.selected_backend))
    }

    /// Start over with a blank session
    pub fn reset(&self, state: &mut SessionState) {
        debug!("reset: called");
        *state = SessionState::default();
    }

    fn require_phase(&self, state: &SessionState, wanted: Phase, operation: &'static str) -> Result<(), SessionError> {
        let phase = self.phase(state);
        if phase == wanted {
            Ok(())
        } else {
            debug!(%phase, %wanted, %operation, "require_phase: rejected");
            Err(SessionError::WrongPhase { operation, phase })
        }
    }
}
