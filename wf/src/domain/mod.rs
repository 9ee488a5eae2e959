//! Domain types for trip planning
//!
//! - [`trip`] - trip request form and validated trip
//! - [`flight`] - flight options in the search service's shape
//! - [`chat`] - append-only chat transcript

pub mod chat;
pub mod flight;
pub mod trip;

pub use chat::{APOLOGY, ChatMessage, ChatRole, Transcript, welcome_text};
pub use flight::{
    AirportTime, CarbonEmissions, DataOrigin, FlightOption, FlightQuery, FlightQueryResult, FlightSegment, Layover,
};
pub use trip::{Trip, TripRequest, ValidationError};
