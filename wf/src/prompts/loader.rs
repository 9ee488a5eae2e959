//! Prompt Loader
//!
//! Loads prompt templates from the override directory or falls back to
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::Trip;

/// Markdown headings every itinerary must carry, in order
///
/// The plan renderer keys off these; an itinerary template that drops one is
/// rejected before anything is sent upstream.
pub const REQUIRED_SECTIONS: [&str; 7] = [
    "Trip Overview",
    "Day-by-Day Itinerary",
    "Accommodations",
    "Must-Visit Attractions",
    "Local Food Guide",
    "Transportation Tips",
    "Cost Breakdown",
];

/// Context for rendering the itinerary template
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryContext {
    pub source: String,
    pub destination: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub days: i64,
    pub budget: String,
    pub travelers: String,
    pub interests: String,
}

impl ItineraryContext {
    pub fn from_trip(trip: &Trip) -> Self {
        debug!(destination = %trip.destination, "ItineraryContext::from_trip: called");
        Self {
            source: trip.source.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date.format("%Y-%m-%d").to_string(),
            end_date: trip.end_date.format("%Y-%m-%d").to_string(),
            days: trip.trip_days(),
            budget: trip.budget.clone(),
            travelers: trip.travelers.clone(),
            interests: trip.interests.clone(),
        }
    }
}

/// Context for rendering the follow-up template
#[derive(Debug, Clone, Serialize)]
pub struct FollowUpContext {
    pub itinerary: String,
    pub question: String,
    /// Set when the itinerary was cut to fit `max_chars`
    pub truncated: bool,
}

impl FollowUpContext {
    /// Build the context, keeping at most `max_chars` characters of the itinerary (0 = no limit)
    pub fn new(question: &str, itinerary: &str, max_chars: usize) -> Self {
        debug!(question_len = question.len(), itinerary_len = itinerary.len(), %max_chars, "FollowUpContext::new: called");
        let truncated = max_chars > 0 && itinerary.chars().count() > max_chars;
        let itinerary = if truncated {
            debug!("FollowUpContext::new: truncating itinerary");
            itinerary.chars().take(max_chars).collect()
        } else {
            itinerary.to_string()
        };

        Self {
            itinerary,
            question: question.to_string(),
            truncated,
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` for overrides before the embedded templates
    pub fn new(dir: Option<impl AsRef<Path>>) -> Self {
        let user_dir = dir.map(|d| d.as_ref().to_path_buf()).filter(|d| d.exists());
        debug!(?user_dir, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            user_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    // Prompts are plain text sent to a model, so HTML escaping would only corrupt them.
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    fn render<T: Serialize>(&self, name: &str, template: &str, context: &T) -> Result<String> {
        self.hbs
            .render_template(template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", name, e))
    }

    /// Render the itinerary prompt for a validated trip
    pub fn itinerary(&self, trip: &Trip) -> Result<String> {
        debug!(destination = %trip.destination, "PromptLoader::itinerary: called");
        let template = self.load_template("itinerary")?;

        let missing: Vec<&str> = REQUIRED_SECTIONS
            .iter()
            .copied()
            .filter(|section| !template.contains(section))
            .collect();
        if !missing.is_empty() {
            return Err(eyre!(
                "Itinerary template is missing required sections: {}",
                missing.join(", ")
            ));
        }

        info!("Rendering itinerary prompt for {}", trip.destination);
        self.render("itinerary", &template, &ItineraryContext::from_trip(trip))
    }

    /// System instruction for `prompt` (`itinerary` or `followup`), trimmed
    pub fn system(&self, prompt: &str) -> Result<String> {
        debug!(%prompt, "PromptLoader::system: called");
        let text = self.load_template(&format!("{}-system", prompt))?;
        Ok(text.trim().to_string())
    }

    /// Render the follow-up prompt
    pub fn followup(&self, context: &FollowUpContext) -> Result<String> {
        debug!(truncated = %context.truncated, "PromptLoader::followup: called");
        let template = self.load_template("followup")?;
        self.render("followup", &template, context)
    }
}
