//! Follow-up question client
//!
//! Answers a question about an existing plan. Only the original plan and the
//! current question are sent; earlier answers are not.

use std::sync::Arc;

use keystore::{CredentialStore, Service};
use tracing::{debug, warn};

use crate::credentials::require_key;
use crate::domain::ValidationError;
use crate::error::TripError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{FollowUpContext, PromptLoader};

pub struct FollowUpClient {
    llm: Arc<dyn LlmClient>,
    credentials: Arc<dyn CredentialStore>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
    max_itinerary_chars: usize,
}

impl FollowUpClient {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        credentials: Arc<dyn CredentialStore>,
        prompts: Arc<PromptLoader>,
        max_tokens: u32,
        max_itinerary_chars: usize,
    ) -> Self {
        Self {
            llm,
            credentials,
            prompts,
            max_tokens,
            max_itinerary_chars,
        }
    }

    fn build_request(&self, context: &FollowUpContext) -> eyre::Result<CompletionRequest> {
        let prompt = self.prompts.followup(context)?;
        let system = self.prompts.system("followup")?;
        Ok(CompletionRequest::new(prompt, self.max_tokens).with_system(system))
    }

    /// Answer `question` in the context of `itinerary`
    ///
    /// Shares the itinerary service's credential.
    pub async fn ask(&self, question: &str, itinerary: &str) -> Result<String, TripError> {
        debug!(question_len = question.len(), itinerary_len = itinerary.len(), "ask: called");
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }
        let api_key = require_key(self.credentials.as_ref(), Service::Itinerary)?;

        let context = FollowUpContext::new(question, itinerary, self.max_itinerary_chars);
        if context.truncated {
            warn!(max_chars = %self.max_itinerary_chars, "ask: itinerary truncated for follow-up prompt");
        }
        let request = self.build_request(&context).map_err(|e| {
            warn!(error = %e, "ask: prompt rendering failed");
            TripError::chat()
        })?;

        let response = self
            .llm
            .complete(&api_key, request)
            .await
            .map_err(|e| {
                warn!(error = %e, status = ?e.status(), "ask: itinerary service failed");
                TripError::chat()
            })?;

        match response.content {
            Some(answer) if !answer.trim().is_empty() => Ok(answer),
            _ => {
                warn!(stop_reason = ?response.stop_reason, "ask: empty response");
                Err(TripError::chat())
            }
        }
    }
}
