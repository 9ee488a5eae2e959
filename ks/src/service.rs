//! Credential slots

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The remote service a credential belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// Generative text backend (itinerary and follow-up chat)
    Itinerary,
    /// Flight search backend
    Flights,
}

impl Service {
    /// All known services, in display order
    pub const ALL: [Service; 2] = [Service::Itinerary, Service::Flights];

    /// Storage slot name for this service
    pub fn slot(&self) -> &'static str {
        match self {
            Service::Itinerary => "gemini_api_key",
            Service::Flights => "serpapi_key",
        }
    }

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Service::Itinerary => "itinerary",
            Service::Flights => "flights",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Service {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "itinerary" | "gemini" | "llm" => Ok(Service::Itinerary),
            "flights" | "flight" | "serpapi" => Ok(Service::Flights),
            other => Err(eyre::eyre!(
                "Unknown service '{}'. Supported: itinerary, flights",
                other
            )),
        }
    }
}
