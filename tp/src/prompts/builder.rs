//! Travel prompt builder
//!
//! Turns a collected answer set into the itinerary prompt, one labeled
//! section per answered stage in catalog order.

use eyre::Result;
use serde::Serialize;
use tracing::debug;

use super::PromptLoader;
use crate::stages::{AnswerSet, Stage};

/// One labeled answer in the rendered prompt
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PromptSection {
    pub heading: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
struct TravelPromptContext {
    sections: Vec<PromptSection>,
}

/// Answered stages in catalog order, skipping the introduction and blanks
///
/// Answers for names missing from the catalog are ignored.
pub fn prompt_sections(stages: &[Stage], answers: &AnswerSet) -> Vec<PromptSection> {
    stages
        .iter()
        .filter(|stage| !stage.is_introduction())
        .filter_map(|stage| {
            let answer = answers.get(stage.name)?.trim();
            if answer.is_empty() {
                return None;
            }
            Some(PromptSection {
                heading: stage.title(),
                answer: answer.to_string(),
            })
        })
        .collect()
}

/// Build the itinerary prompt for the given answers
pub fn build_travel_prompt(loader: &PromptLoader, stages: &[Stage], answers: &AnswerSet) -> Result<String> {
    let sections = prompt_sections(stages, answers);
    debug!(section_count = sections.len(), "build_travel_prompt: called");
    let rendered = loader.render("travel-plan", &TravelPromptContext { sections })?;
    Ok(normalize_whitespace(&rendered))
}

/// Trim trailing spaces, collapse runs of blank lines, drop outer blank lines
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            if !previous_blank && !lines.is_empty() {
                lines.push("");
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }

    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines.join("\n")
}
