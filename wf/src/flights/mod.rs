//! Flight lookup
//!
//! [`FlightClient`] decides between the live search backend and the
//! synthetic dataset:
//!
//! - no flight key stored: synthetic dataset, not an error
//! - key stored, service answers non-2xx: [`TripError::FlightLookup`]
//! - key stored, request never completes: error, or synthetic dataset when
//!   `flights.fallback-on-transport-error` is set

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use keystore::{CredentialStore, Service};
use thiserror::Error;
use tracing::{debug, info, warn};

mod serpapi;
mod synthetic;

pub use serpapi::SerpApiClient;
pub use synthetic::synthetic_flights;

use crate::credentials::optional_key;
use crate::domain::{DataOrigin, FlightOption, FlightQuery, FlightQueryResult, ValidationError};
use crate::error::TripError;

/// Errors from a flight search backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("flight service returned HTTP {status}")]
    Status { status: u16, message: String },

    #[error("flight service unreachable: {0}")]
    Transport(String),

    #[error("flight service reported: {0}")]
    Upstream(String),

    #[error("unexpected flight service response: {0}")]
    Malformed(String),
}

impl SearchError {
    /// Whether the request never produced an HTTP response
    pub fn is_transport(&self) -> bool {
        matches!(self, SearchError::Transport(_))
    }
}

/// A one-way flight search backend
#[async_trait]
pub trait FlightSearch: Send + Sync {
    /// Search one-way options, returned in the backend's ranking order
    async fn search(&self, api_key: &str, query: &FlightQuery) -> Result<Vec<FlightOption>, SearchError>;
}

pub struct FlightClient {
    search: Arc<dyn FlightSearch>,
    credentials: Arc<dyn CredentialStore>,
    fallback_on_transport_error: bool,
}

impl FlightClient {
    pub fn new(
        search: Arc<dyn FlightSearch>,
        credentials: Arc<dyn CredentialStore>,
        fallback_on_transport_error: bool,
    ) -> Self {
        Self {
            search,
            credentials,
            fallback_on_transport_error,
        }
    }

    /// Look up one-way flights from `source` to `destination` on `date`
    pub async fn lookup_flights(
        &self,
        source: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<FlightQueryResult, TripError> {
        debug!(%source, %destination, %date, "lookup_flights: called");
        let query = FlightQuery::new(source, destination, date);
        if query.departure_id.is_empty() {
            return Err(ValidationError::MissingField("source").into());
        }
        if query.arrival_id.is_empty() {
            return Err(ValidationError::MissingField("destination").into());
        }

        let Some(api_key) = optional_key(self.credentials.as_ref(), Service::Flights)? else {
            info!("No flight key configured, serving demo flights");
            return Ok(synthetic_flights(&query));
        };

        match self.search.search(&api_key, &query).await {
            Ok(options) => {
                info!(count = %options.len(), "Flight lookup returned options");
                Ok(FlightQueryResult {
                    options,
                    origin: DataOrigin::Live,
                })
            }
            Err(e) if e.is_transport() && self.fallback_on_transport_error => {
                warn!(error = %e, "lookup_flights: transport failure, serving demo flights");
                Ok(synthetic_flights(&query))
            }
            Err(e) => {
                if let SearchError::Status { status, message } = &e {
                    warn!(%status, %message, "lookup_flights: flight service error");
                } else {
                    warn!(error = %e, "lookup_flights: flight lookup failed");
                }
                Err(TripError::flight_lookup(e))
            }
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock flight backend replaying scripted results
    pub struct MockFlightSearch {
        replies: Mutex<VecDeque<(Duration, Result<Vec<FlightOption>, SearchError>)>>,
        calls: Mutex<Vec<(String, FlightQuery)>>,
    }

    impl MockFlightSearch {
        pub fn new(replies: Vec<Result<Vec<FlightOption>, SearchError>>) -> Self {
            Self::delayed(replies.into_iter().map(|r| (Duration::ZERO, r)).collect())
        }

        pub fn delayed(replies: Vec<(Duration, Result<Vec<FlightOption>, SearchError>)>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<(String, FlightQuery)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FlightSearch for MockFlightSearch {
        async fn search(&self, api_key: &str, query: &FlightQuery) -> Result<Vec<FlightOption>, SearchError> {
            self.calls.lock().unwrap().push((api_key.to_string(), query.clone()));
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some((delay, result)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    result
                }
                None => Err(SearchError::Malformed("No more mock responses".to_string())),
            }
        }
    }
}
