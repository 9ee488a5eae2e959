//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// The API key is passed per call rather than held by the client, so the
/// credential store stays the single source of truth and a key changed
/// mid-session is picked up by the next request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, api_key: &str, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
