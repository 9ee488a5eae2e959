//! Trip planning error types
//!
//! Every variant renders a message that is safe to show to the user.
//! Upstream detail (status codes, response bodies) goes to the log instead.

use keystore::Service;
use thiserror::Error;

use crate::domain::ValidationError;

/// Errors surfaced by the planner and its clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    /// Incomplete or inconsistent input; no network call was made
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("No {service} API key configured. Set one with `wf key set {service} <KEY>`.")]
    MissingCredential { service: Service },

    #[error("{message}")]
    Generation { message: String },

    #[error("{message}")]
    FlightLookup { message: String },

    #[error("{message}")]
    Chat { message: String },

    #[error("A chat reply is still pending")]
    ChatBusy,

    #[error("Generate an itinerary before asking follow-up questions")]
    NoItinerary,

    #[error("Credential store error: {0}")]
    Credential(String),

    #[error("Planner is not running")]
    Channel,
}

impl TripError {
    pub fn generation() -> Self {
        TripError::Generation {
            message: "Failed to generate travel plan. Please try again.".to_string(),
        }
    }

    pub fn flight_lookup(detail: impl std::fmt::Display) -> Self {
        TripError::FlightLookup {
            message: format!("Could not retrieve flight information: {}", detail),
        }
    }

    pub fn chat() -> Self {
        TripError::Chat {
            message: "Failed to answer the follow-up question".to_string(),
        }
    }

    /// Whether the user needs to configure a key before retrying
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, TripError::MissingCredential { .. })
    }
}

impl From<eyre::Report> for TripError {
    fn from(e: eyre::Report) -> Self {
        TripError::Credential(e.to_string())
    }
}
