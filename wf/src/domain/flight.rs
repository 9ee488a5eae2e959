//! Flight option types
//!
//! Field layout mirrors the flight search service's native JSON so results
//! pass through without re-shaping. Rust-side names are descriptive; serde
//! renames keep the wire names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One-way flight search parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
    /// Departure airport code or location
    pub departure_id: String,
    /// Arrival airport code or location
    pub arrival_id: String,
    pub outbound_date: NaiveDate,
}

impl FlightQuery {
    pub fn new(departure_id: impl Into<String>, arrival_id: impl Into<String>, outbound_date: NaiveDate) -> Self {
        Self {
            departure_id: departure_id.into().trim().to_string(),
            arrival_id: arrival_id.into().trim().to_string(),
            outbound_date,
        }
    }

    /// Outbound date as sent upstream, always `YYYY-MM-DD`
    pub fn outbound_date_param(&self) -> String {
        self.outbound_date.format("%Y-%m-%d").to_string()
    }
}

/// Airport plus local time for one end of a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportTime {
    pub id: String,
    pub name: String,
    /// Local time as reported upstream, e.g. `2025-03-07 17:05`
    pub time: String,
}

/// A single flown leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub departure_airport: AirportTime,
    pub arrival_airport: AirportTime,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub airplane: Option<String>,
    pub airline: String,
    #[serde(default)]
    pub airline_logo: Option<String>,
    #[serde(default)]
    pub travel_class: String,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub legroom: Option<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub overnight: bool,
}

/// A connection between two segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layover {
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    #[serde(rename = "name")]
    pub airport_name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub overnight: bool,
}

/// Emissions estimate in grams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonEmissions {
    pub this_flight: u64,
    #[serde(default)]
    pub typical_for_this_route: Option<u64>,
    #[serde(default)]
    pub difference_percent: Option<i32>,
}

/// A bookable itinerary made of one or more segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOption {
    #[serde(rename = "flights")]
    pub segments: Vec<FlightSegment>,
    #[serde(default)]
    pub layovers: Vec<Layover>,
    #[serde(rename = "total_duration")]
    pub total_duration_minutes: u32,
    #[serde(default)]
    pub carbon_emissions: Option<CarbonEmissions>,
    /// Price in the requested currency
    #[serde(default)]
    pub price: Option<u32>,
    #[serde(rename = "type", default)]
    pub trip_type: Option<String>,
    #[serde(default)]
    pub airline_logo: Option<String>,
    #[serde(default)]
    pub booking_token: Option<String>,
}

impl FlightOption {
    /// Airline of the first segment
    pub fn airline(&self) -> Option<&str> {
        self.segments.first().map(|s| s.airline.as_str())
    }

    /// Flight number of the first segment
    pub fn flight_number(&self) -> Option<&str> {
        self.segments.first().map(|s| s.flight_number.as_str())
    }

    /// Travel class of the first segment
    pub fn travel_class(&self) -> Option<&str> {
        self.segments.first().map(|s| s.travel_class.as_str())
    }

    /// Where the journey starts
    pub fn departure_airport(&self) -> Option<&AirportTime> {
        self.segments.first().map(|s| &s.departure_airport)
    }

    /// Where the journey ends
    pub fn arrival_airport(&self) -> Option<&AirportTime> {
        self.segments.last().map(|s| &s.arrival_airport)
    }

    /// Number of stops between departure and arrival
    pub fn stops(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Structural check applied at the service boundary
    pub fn validate(&self) -> Result<(), String> {
        if self.segments.is_empty() {
            debug!("FlightOption::validate: no segments");
            return Err("flight option has no segments".to_string());
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            if segment.departure_airport.id.trim().is_empty() || segment.arrival_airport.id.trim().is_empty() {
                debug!(%idx, "FlightOption::validate: segment missing airport id");
                return Err(format!("segment {} is missing an airport id", idx + 1));
            }
        }
        Ok(())
    }
}

/// Where a flight result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Returned by the flight search service
    Live,
    /// Generated locally because no flight credential is configured
    Synthetic,
}

/// Ordered flight options, ranked upstream and never re-sorted here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQueryResult {
    pub options: Vec<FlightOption>,
    pub origin: DataOrigin,
}

impl FlightQueryResult {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }
}
