//! Backend probe
//!
//! Sends a fixed set of travel questions to both backends so a user can
//! check their setup and eyeball how the two models differ.

use std::fmt::Write;

use tracing::{debug, info};

use crate::gateway::{Backend, Gateway, PlanSet, render_outcome};

/// Short travel questions sent to each backend
pub const TEST_PROMPTS: [&str; 5] = [
    "What are the top 3 tourist attractions in Barcelona that are off the beaten path?",
    "Create a 3-day itinerary for Tokyo for a first-time visitor.",
    "What's the best time of year to visit New Zealand and why?",
    "Suggest some budget-friendly accommodations in Bali.",
    "What cultural considerations should I be aware of when visiting Morocco?",
];

/// Full planning request used for the side-by-side comparison
pub const COMPARISON_PROMPT: &str = "I'm planning a 7-day trip to Italy in June with my family \
(2 adults, 2 children ages 10 and 14). We're interested in historical sites, good food, and some \
outdoor activities. Our budget is around $5000 excluding flights. Can you suggest an itinerary \
that includes Rome and Florence?";

const RULE_WIDTH: usize = 80;

/// One prompt and what each backend answered
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub prompt: &'static str,
    pub plans: PlanSet,
}

/// Run the probe prompts against both backends
///
/// Each prompt goes to both backends concurrently; prompts run one after
/// another. The comparison prompt is always last.
pub async fn run_probe(gateway: &Gateway, compare_only: bool) -> Vec<ProbeResult> {
    debug!(%compare_only, "run_probe: called");
    let prompts: Vec<&'static str> = if compare_only {
        vec![COMPARISON_PROMPT]
    } else {
        TEST_PROMPTS.iter().copied().chain([COMPARISON_PROMPT]).collect()
    };

    let mut results = Vec::with_capacity(prompts.len());
    for prompt in prompts {
        let plans = gateway.compare(prompt).await;
        let failures = plans.values().filter(|o| o.is_err()).count();
        info!(prompt_len = prompt.len(), failures, "run_probe: prompt answered");
        results.push(ProbeResult { prompt, plans });
    }
    results
}

/// Plain-text report with every response under its backend label
pub fn format_report(gateway: &Gateway, results: &[ProbeResult]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "Test Prompt {}: {}", i + 1, result.prompt);
        for backend in Backend::ALL {
            if let Some(outcome) = result.plans.get(&backend) {
                let _ = writeln!(out);
                let _ = writeln!(out, "{} Response:", gateway.label(backend));
                let _ = writeln!(out, "{}", render_outcome(outcome));
            }
        }
        let _ = writeln!(out, "{}", rule);
    }
    out
}
