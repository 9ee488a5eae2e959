//! SerpAPI Google Flights backend

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{FlightSearch, SearchError};
use crate::config::FlightsConfig;
use crate::domain::{FlightOption, FlightQuery};

/// `type` parameter value for one-way searches
const ONE_WAY: &str = "2";

/// Flight search against SerpAPI's `google_flights` engine
pub struct SerpApiClient {
    base_url: String,
    engine: String,
    currency: String,
    http: Client,
}

impl SerpApiClient {
    pub fn from_config(config: &FlightsConfig) -> Result<Self, SearchError> {
        debug!(base_url = %config.base_url, engine = %config.engine, "SerpApiClient::from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            engine: config.engine.clone(),
            currency: config.currency.clone(),
            http,
        })
    }

    /// Query parameters, minus the key
    fn query_params(&self, query: &FlightQuery) -> Vec<(&'static str, String)> {
        vec![
            ("engine", self.engine.clone()),
            ("departure_id", query.departure_id.clone()),
            ("arrival_id", query.arrival_id.clone()),
            ("outbound_date", query.outbound_date_param()),
            ("currency", self.currency.clone()),
            ("type", ONE_WAY.to_string()),
        ]
    }
}

#[async_trait]
impl FlightSearch for SerpApiClient {
    async fn search(&self, api_key: &str, query: &FlightQuery) -> Result<Vec<FlightOption>, SearchError> {
        debug!(departure = %query.departure_id, arrival = %query.arrival_id, "SerpApiClient::search: called");
        let mut params = self.query_params(query);
        params.push(("api_key", api_key.to_string()));

        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                // Never echo the request URL: it carries the key
                SearchError::Transport(e.without_url().to_string())
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(%status, "SerpApiClient::search: API error");
            return Err(SearchError::Status { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.without_url().to_string()))?;
        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    best_flights: Vec<FlightOption>,
    #[serde(default)]
    other_flights: Vec<FlightOption>,
    error: Option<String>,
}

/// Parse a search response body into validated options, keeping upstream order
///
/// `other_flights` is used only when the service ranked no `best_flights`.
pub(crate) fn parse_response(body: &str) -> Result<Vec<FlightOption>, SearchError> {
    debug!(body_len = body.len(), "parse_response: called");
    let response: SerpApiResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Malformed(e.to_string()))?;

    let options = if response.best_flights.is_empty() {
        response.other_flights
    } else {
        response.best_flights
    };

    if options.is_empty()
        && let Some(error) = response.error
    {
        debug!(%error, "parse_response: service reported an error");
        return Err(SearchError::Upstream(error));
    }

    Ok(options
        .into_iter()
        .enumerate()
        .filter_map(|(idx, option)| match option.validate() {
            Ok(()) => Some(option),
            Err(reason) => {
                warn!(%idx, %reason, "parse_response: dropping invalid flight option");
                None
            }
        })
        .collect())
}
