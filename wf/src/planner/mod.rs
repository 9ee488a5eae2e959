//! Trip planning orchestrator with actor pattern
//!
//! [`PlannerHandle`] owns a [`Session`] and sequences the itinerary, flight
//! and follow-up clients around it.

mod manager;
mod messages;
mod session;

pub use manager::{PlannerHandle, PlannerServices};
pub use messages::{PlannerCommand, PlannerEvent, PlannerResponse};
pub use session::{ChatTicket, FlightRequest, Phase, PlanOutcome, Session, ViewState};
