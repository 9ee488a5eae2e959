//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for itinerary generation
//! and follow-up questions.
//!
//! Template loading chain:
//! 1. `{prompts.dir}/{name}.pmt` (user override, when configured)
//! 2. Embedded default compiled into the binary
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{FollowUpContext, ItineraryContext, PromptLoader, REQUIRED_SECTIONS};
