//! Itinerary generation client
//!
//! Turns a validated [`Trip`] into a markdown travel plan via the itinerary
//! service. Every call goes upstream; nothing is cached.

use std::sync::Arc;

use keystore::{CredentialStore, Service};
use tracing::{debug, info, warn};

use crate::credentials::require_key;
use crate::domain::Trip;
use crate::error::TripError;
use crate::llm::{CompletionRequest, LlmClient, StopReason};
use crate::prompts::PromptLoader;

pub struct ItineraryClient {
    llm: Arc<dyn LlmClient>,
    credentials: Arc<dyn CredentialStore>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl ItineraryClient {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        credentials: Arc<dyn CredentialStore>,
        prompts: Arc<PromptLoader>,
        max_tokens: u32,
    ) -> Self {
        Self {
            llm,
            credentials,
            prompts,
            max_tokens,
        }
    }

    fn build_request(&self, trip: &Trip) -> eyre::Result<CompletionRequest> {
        let prompt = self.prompts.itinerary(trip)?;
        let system = self.prompts.system("itinerary")?;
        Ok(CompletionRequest::new(prompt, self.max_tokens).with_system(system))
    }

    /// Generate the travel plan for `trip`
    ///
    /// Fails with [`TripError::MissingCredential`] before any network call when
    /// no itinerary key is stored. Any upstream problem becomes the generic
    /// [`TripError::generation`] message; the detail is logged.
    pub async fn generate_plan(&self, trip: &Trip) -> Result<String, TripError> {
        debug!(destination = %trip.destination, days = %trip.trip_days(), "generate_plan: called");
        let api_key = require_key(self.credentials.as_ref(), Service::Itinerary)?;

        let request = self.build_request(trip).map_err(|e| {
            warn!(error = %e, "generate_plan: prompt rendering failed");
            TripError::generation()
        })?;

        let response = self
            .llm
            .complete(&api_key, request)
            .await
            .map_err(|e| {
                warn!(error = %e, status = ?e.status(), "generate_plan: itinerary service failed");
                TripError::generation()
            })?;

        if response.stop_reason == StopReason::MaxTokens {
            warn!("generate_plan: plan hit the token limit and may be cut short");
        }

        match response.content {
            Some(plan) if !plan.trim().is_empty() => {
                info!(
                    destination = %trip.destination,
                    output_tokens = %response.usage.output_tokens,
                    "Generated travel plan"
                );
                Ok(plan)
            }
            _ => {
                warn!(stop_reason = ?response.stop_reason, "generate_plan: empty response");
                Err(TripError::generation())
            }
        }
    }
}
