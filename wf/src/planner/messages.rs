//! Planner messages
//!
//! Commands and events for the actor pattern.

use tokio::sync::oneshot;

use crate::domain::{ChatMessage, DataOrigin, FlightQueryResult, TripRequest};
use crate::error::TripError;

use super::session::ViewState;

/// Response from planner operations
pub type PlannerResponse<T> = Result<T, TripError>;

/// Commands sent to the planner actor
#[derive(Debug)]
pub enum PlannerCommand {
    // Front-end requests
    Submit {
        request: TripRequest,
        reply: oneshot::Sender<PlannerResponse<u64>>,
    },
    Ask {
        question: String,
        reply: oneshot::Sender<PlannerResponse<ChatMessage>>,
    },
    Snapshot {
        reply: oneshot::Sender<ViewState>,
    },
    Shutdown,

    // Results posted back by spawned service calls
    PlanCompleted {
        generation: u64,
        result: Result<String, TripError>,
    },
    FlightsCompleted {
        generation: u64,
        result: Result<FlightQueryResult, TripError>,
    },
    ChatCompleted {
        result: Result<String, TripError>,
    },
}

/// Event broadcast as the session moves between phases
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    /// A submission passed validation and the plan request is in flight
    Submitted { generation: u64 },
    /// An in-flight submission was replaced by a newer one
    Superseded { generation: u64 },
    PlanReady { generation: u64, destination: String },
    PlanFailed { generation: u64, error: TripError },
    FlightsLoading { generation: u64 },
    FlightsReady {
        generation: u64,
        count: usize,
        origin: DataOrigin,
    },
    FlightsFailed { generation: u64, error: TripError },
    /// No more work is outstanding for this generation
    Settled { generation: u64 },
    ChatAnswered { message: ChatMessage },
    /// The question got the apology reply; `error` says why
    ChatFailed { error: TripError },
}

impl PlannerEvent {
    /// Whether this event ends the given generation's work
    pub fn ends(&self, generation: u64) -> bool {
        match self {
            PlannerEvent::Settled { generation: g } | PlannerEvent::Superseded { generation: g } => *g == generation,
            _ => false,
        }
    }
}
