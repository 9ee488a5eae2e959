//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Itinerary generation prompt
pub const ITINERARY: &str = include_str!("../../prompts/itinerary.pmt");

/// System instruction sent with the itinerary prompt
pub const ITINERARY_SYSTEM: &str = include_str!("../../prompts/itinerary-system.pmt");

/// Follow-up question prompt
pub const FOLLOWUP: &str = include_str!("../../prompts/followup.pmt");

/// System instruction sent with every follow-up question
pub const FOLLOWUP_SYSTEM: &str = include_str!("../../prompts/followup-system.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "itinerary" => Some(ITINERARY),
        "itinerary-system" => Some(ITINERARY_SYSTEM),
        "followup" => Some(FOLLOWUP),
        "followup-system" => Some(FOLLOWUP_SYSTEM),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
