//! Stage catalog
//!
//! The fixed, ordered intake questionnaire. The first stage is always the
//! introduction sentinel, which asks nothing and never reaches the prompt.

use std::collections::BTreeMap;

use tracing::debug;

/// Collected answers, keyed by stage name
pub type AnswerSet = BTreeMap<String, String>;

/// Name of the introduction sentinel stage
pub const INTRODUCTION: &str = "introduction";

/// One step of the intake questionnaire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Identifier, also the key in the answer set
    pub name: &'static str,
    /// Question shown to the user
    pub prompt: &'static str,
    /// Whether a blank answer is rejected
    pub required: bool,
    /// Sample answer offered on request
    pub example: Option<&'static str>,
}

impl Stage {
    pub const fn new(name: &'static str, prompt: &'static str, required: bool) -> Self {
        Self {
            name,
            prompt,
            required,
            example: None,
        }
    }

    pub const fn with_example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }

    pub fn is_introduction(&self) -> bool {
        self.name == INTRODUCTION
    }

    /// Display heading derived from the name: `travel_dates` -> `Travel Dates`
    pub fn title(&self) -> String {
        title_case(self.name)
    }
}

/// Turn a snake_case identifier into a title-cased heading
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const DEFAULT_STAGES: [Stage; 9] = [
    Stage::new(
        INTRODUCTION,
        "Welcome to your personal travel assistant! I'll help you plan the perfect trip based on your preferences. Let me ask you a few questions to get started.",
        false,
    ),
    Stage::new(
        "personal_info",
        "Tell me a little about yourself and who you'll be traveling with.",
        true,
    )
    .with_example("My name is Alex, I'm 32 years old, and I'll be traveling with my partner."),
    Stage::new("travel_destination", "Where would you like to travel?", true)
        .with_example("I'd like to visit Barcelona, Spain."),
    Stage::new("travel_dates", "When are you planning to travel, and for how long?", true)
        .with_example("Planning to travel for 10 days in August 2025."),
    Stage::new("budget", "What is your budget for this trip?", true)
        .with_example("My budget is around $3000 for the entire trip excluding flights."),
    Stage::new(
        "interests",
        "What kinds of activities and experiences interest you?",
        true,
    )
    .with_example("I'm interested in historical sites, local cuisine, and beach activities."),
    Stage::new(
        "accommodation",
        "What type of accommodation do you prefer (hotel, hostel, apartment, resort)?",
        true,
    ),
    Stage::new(
        "dietary_restrictions",
        "Do you have any dietary restrictions or food preferences? (optional)",
        false,
    ),
    Stage::new(
        "additional_info",
        "Is there anything else I should know to plan your trip? (optional)",
        false,
    ),
];

/// The standard questionnaire, identical on every call
pub fn default_stages() -> Vec<Stage> {
    debug!("default_stages: called");
    DEFAULT_STAGES.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stages_stable() {
        assert_eq!(default_stages(), default_stages());
    }

    #[test]
    fn test_introduction_first_and_optional() {
        let stages = default_stages();
        assert!(stages[0].is_introduction());
        assert!(!stages[0].required);
        assert_eq!(stages.iter().filter(|s| s.is_introduction()).count(), 1);
    }

    #[test]
    fn test_required_flags() {
        let stages = default_stages();
        let required: Vec<_> = stages.iter().filter(|s| s.required).map(|s| s.name).collect();
        assert_eq!(
            required,
            vec![
                "personal_info",
                "travel_destination",
                "travel_dates",
                "budget",
                "interests",
                "accommodation"
            ]
        );
    }

    #[test]
    fn test_stage_names_unique() {
        let stages = default_stages();
        let mut names: Vec<_> = stages.iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), stages.len());
    }

    #[test]
    fn test_title() {
        assert_eq!(title_case("travel_destination"), "Travel Destination");
        assert_eq!(title_case("budget"), "Budget");
        assert_eq!(title_case("dietary__restrictions_"), "Dietary Restrictions");
        assert_eq!(Stage::new("additional_info", "", false).title(), "Additional Info");
    }

    #[test]
    fn test_examples_present_for_core_questions() {
        let stages = default_stages();
        let with_examples: Vec<_> = stages.iter().filter(|s| s.example.is_some()).map(|s| s.name).collect();
        assert_eq!(
            with_examples,
            vec!["personal_info", "travel_destination", "travel_dates", "budget", "interests"]
        );
    }
}
