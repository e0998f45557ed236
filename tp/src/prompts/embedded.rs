//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Initial itinerary prompt, one section per answered stage
pub const TRAVEL_PLAN: &str = include_str!("../../prompts/travel-plan.pmt");

/// Follow-up prompt embedding a previous plan and the requested changes
pub const REFINE: &str = include_str!("../../prompts/refine.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "travel-plan" => Some(TRAVEL_PLAN),
        "refine" => Some(REFINE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
