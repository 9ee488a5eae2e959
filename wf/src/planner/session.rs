//! Planning session state machine
//!
//! Pure and synchronous: the actor in [`super::manager`] owns one
//! [`Session`], performs the network calls, and feeds the results back in.
//!
//! ```text
//! Idle -> Submitting -> PlanReady -> FlightsLoading -> FlightsReady
//!                    \-> PlanFailed                 \-> FlightsFailed
//! ```
//!
//! Every submission bumps a generation counter. Results carry the generation
//! they were started for and are dropped if a newer submission has happened
//! since, so the last submission always wins.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    APOLOGY, ChatMessage, FlightQueryResult, Transcript, Trip, TripRequest, ValidationError, welcome_text,
};
use crate::error::TripError;

/// Where the current submission stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    PlanReady,
    PlanFailed,
    FlightsLoading,
    FlightsReady,
    FlightsFailed,
}

impl Phase {
    /// Whether a network call for the current generation is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Submitting | Phase::FlightsLoading)
    }
}

/// Everything a front end needs to draw the session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub phase: Phase,
    /// Most recent successful plan; kept when a later submission fails
    pub plan: Option<String>,
    /// Destination the plan was generated for
    pub destination: Option<String>,
    pub flights: Option<FlightQueryResult>,
    #[serde(skip)]
    pub plan_error: Option<TripError>,
    #[serde(skip)]
    pub flight_error: Option<TripError>,
    /// A follow-up question is awaiting its answer
    pub chat_pending: bool,
    pub transcript: Transcript,
    pub generation: u64,
}

/// Flight lookup to start after a plan lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRequest {
    pub generation: u64,
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
}

/// What the caller must do after feeding in a plan result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Result belonged to a superseded submission and was dropped
    Stale,
    /// Plan stored, flights requested
    LookupFlights(FlightRequest),
    /// Plan stored, itinerary-only request
    Ready,
    /// Generation failed
    Failed(TripError),
}

/// A follow-up question accepted for sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTicket {
    pub question: String,
    pub itinerary: String,
    pub message: ChatMessage,
}

#[derive(Debug, Default)]
pub struct Session {
    state: ViewState,
    trip: Option<Trip>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// Validate and start a new submission
    ///
    /// On validation failure nothing changes. On success returns the new
    /// generation and the validated trip to generate a plan for.
    pub fn submit(&mut self, request: &TripRequest) -> Result<(u64, Trip), ValidationError> {
        debug!(generation = %self.state.generation, "Session::submit: called");
        let trip = request.validate()?;

        self.state.generation += 1;
        self.state.phase = Phase::Submitting;
        self.state.plan_error = None;
        self.state.flight_error = None;
        self.trip = Some(trip.clone());

        info!(generation = %self.state.generation, destination = %trip.destination, "Submitting trip");
        Ok((self.state.generation, trip))
    }

    /// Apply the itinerary result for `generation`
    pub fn plan_completed(&mut self, generation: u64, result: Result<String, TripError>) -> PlanOutcome {
        debug!(%generation, current = %self.state.generation, "Session::plan_completed: called");
        if generation != self.state.generation || self.state.phase != Phase::Submitting {
            debug!(%generation, "Session::plan_completed: stale result dropped");
            return PlanOutcome::Stale;
        }
        let Some(trip) = self.trip.clone() else {
            return PlanOutcome::Stale;
        };

        match result {
            Ok(plan) => {
                self.state.plan = Some(plan);
                self.state.destination = Some(trip.destination.clone());
                self.state.phase = Phase::PlanReady;
                if self.state.transcript.is_empty() {
                    debug!("Session::plan_completed: seeding welcome message");
                    self.state.transcript.push(ChatMessage::assistant(welcome_text(&trip.destination)));
                }

                if trip.include_flights {
                    self.state.flights = None;
                    self.state.phase = Phase::FlightsLoading;
                    PlanOutcome::LookupFlights(FlightRequest {
                        generation,
                        source: trip.source,
                        destination: trip.destination,
                        date: trip.start_date,
                    })
                } else {
                    self.state.flights = None;
                    PlanOutcome::Ready
                }
            }
            Err(e) => {
                self.state.phase = Phase::PlanFailed;
                self.state.plan_error = Some(e.clone());
                PlanOutcome::Failed(e)
            }
        }
    }

    /// Apply the flight result for `generation`; returns false when dropped as stale
    pub fn flights_completed(&mut self, generation: u64, result: Result<FlightQueryResult, TripError>) -> bool {
        debug!(%generation, current = %self.state.generation, "Session::flights_completed: called");
        if generation != self.state.generation || self.state.phase != Phase::FlightsLoading {
            debug!(%generation, "Session::flights_completed: stale result dropped");
            return false;
        }

        match result {
            Ok(flights) => {
                self.state.flights = Some(flights);
                self.state.phase = Phase::FlightsReady;
            }
            Err(e) => {
                self.state.flights = None;
                self.state.flight_error = Some(e);
                self.state.phase = Phase::FlightsFailed;
            }
        }
        true
    }

    /// Accept a follow-up question and append it to the transcript
    ///
    /// Only one question may be outstanding at a time.
    pub fn begin_chat(&mut self, question: &str) -> Result<ChatTicket, TripError> {
        debug!(question_len = question.len(), "Session::begin_chat: called");
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }
        if self.state.chat_pending {
            return Err(TripError::ChatBusy);
        }
        let Some(itinerary) = self.state.plan.clone() else {
            return Err(TripError::NoItinerary);
        };

        let message = self.state.transcript.push(ChatMessage::user(question)).clone();
        self.state.chat_pending = true;
        Ok(ChatTicket {
            question: question.to_string(),
            itinerary,
            message,
        })
    }

    /// Append the answer (or the apology on failure) and clear the pending flag
    pub fn chat_completed(&mut self, result: Result<String, TripError>) -> ChatMessage {
        debug!(ok = %result.is_ok(), "Session::chat_completed: called");
        self.state.chat_pending = false;
        let content = result.unwrap_or_else(|_| APOLOGY.to_string());
        self.state.transcript.push(ChatMessage::assistant(content)).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatRole, DataOrigin};
    use proptest::prelude::*;

    fn request(include_flights: bool) -> TripRequest {
        TripRequest {
            source: "DEL".to_string(),
            destination: "HAN".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 7),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 10),
            budget: "1500".to_string(),
            travelers: "2".to_string(),
            interests: "food".to_string(),
            include_flights,
        }
    }

    fn flights() -> FlightQueryResult {
        FlightQueryResult {
            options: Vec::new(),
            origin: DataOrigin::Synthetic,
        }
    }

    fn ready_session(include_flights: bool) -> Session {
        let mut session = Session::new();
        let (generation, _) = session.submit(&request(include_flights)).unwrap();
        session.plan_completed(generation, Ok("plan".to_string()));
        session
    }

    #[test]
    fn test_invalid_request_changes_nothing() {
        let mut session = Session::new();
        let mut bad = request(true);
        bad.budget.clear();

        assert_eq!(session.submit(&bad), Err(ValidationError::MissingField("budget")));
        assert_eq!(session.view(), &ViewState::default());
    }

    #[test]
    fn test_itinerary_only_flow() {
        let mut session = Session::new();
        let (generation, trip) = session.submit(&request(false)).unwrap();
        assert_eq!(generation, 1);
        assert_eq!(trip.destination, "HAN");
        assert_eq!(session.view().phase, Phase::Submitting);

        assert_eq!(session.plan_completed(generation, Ok("plan".to_string())), PlanOutcome::Ready);
        let view = session.view();
        assert_eq!(view.phase, Phase::PlanReady);
        assert_eq!(view.plan.as_deref(), Some("plan"));
        assert_eq!(view.destination.as_deref(), Some("HAN"));
        assert!(view.flights.is_none());
    }

    #[test]
    fn test_flights_flow() {
        let mut session = Session::new();
        let (generation, _) = session.submit(&request(true)).unwrap();

        let outcome = session.plan_completed(generation, Ok("plan".to_string()));
        assert_eq!(
            outcome,
            PlanOutcome::LookupFlights(FlightRequest {
                generation,
                source: "DEL".to_string(),
                destination: "HAN".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            })
        );
        assert_eq!(session.view().phase, Phase::FlightsLoading);

        assert!(session.flights_completed(generation, Ok(flights())));
        assert_eq!(session.view().phase, Phase::FlightsReady);
        assert!(session.view().flights.is_some());
    }

    #[test]
    fn test_plan_failure_skips_flights() {
        let mut session = Session::new();
        let (generation, _) = session.submit(&request(true)).unwrap();

        let outcome = session.plan_completed(generation, Err(TripError::generation()));
        assert_eq!(outcome, PlanOutcome::Failed(TripError::generation()));
        assert_eq!(session.view().phase, Phase::PlanFailed);
        assert_eq!(session.view().plan_error, Some(TripError::generation()));
        assert!(session.view().transcript.is_empty());
    }

    #[test]
    fn test_plan_failure_keeps_previous_plan() {
        let mut session = ready_session(false);
        let (generation, _) = session.submit(&request(false)).unwrap();
        session.plan_completed(generation, Err(TripError::generation()));

        assert_eq!(session.view().plan.as_deref(), Some("plan"));
        assert_eq!(session.view().phase, Phase::PlanFailed);
    }

    #[test]
    fn test_flight_failure_keeps_plan_and_clears_flights() {
        let mut session = Session::new();
        let (first, _) = session.submit(&request(true)).unwrap();
        session.plan_completed(first, Ok("plan one".to_string()));
        session.flights_completed(first, Ok(flights()));

        let (second, _) = session.submit(&request(true)).unwrap();
        session.plan_completed(second, Ok("plan two".to_string()));
        session.flights_completed(second, Err(TripError::flight_lookup("HTTP 500")));

        let view = session.view();
        assert_eq!(view.phase, Phase::FlightsFailed);
        assert_eq!(view.plan.as_deref(), Some("plan two"));
        assert!(view.flights.is_none());
        assert!(matches!(view.flight_error, Some(TripError::FlightLookup { .. })));
    }

    #[test]
    fn test_itinerary_only_clears_previous_flights() {
        let mut session = Session::new();
        let (first, _) = session.submit(&request(true)).unwrap();
        session.plan_completed(first, Ok("plan".to_string()));
        session.flights_completed(first, Ok(flights()));
        assert!(session.view().flights.is_some());

        let (second, _) = session.submit(&request(false)).unwrap();
        session.plan_completed(second, Ok("plan".to_string()));
        assert!(session.view().flights.is_none());
    }

    #[test]
    fn test_welcome_seeded_once() {
        let mut session = ready_session(false);
        let (generation, _) = session.submit(&request(false)).unwrap();
        session.plan_completed(generation, Ok("plan again".to_string()));

        let transcript = &session.view().transcript;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, ChatRole::Assistant);
        assert!(transcript.messages()[0].content.contains("HAN"));
    }

    #[test]
    fn test_stale_plan_dropped() {
        let mut session = Session::new();
        let (first, _) = session.submit(&request(true)).unwrap();
        let (second, _) = session.submit(&request(false)).unwrap();

        assert_eq!(session.plan_completed(first, Ok("old".to_string())), PlanOutcome::Stale);
        assert_eq!(session.view().phase, Phase::Submitting);
        assert!(session.view().plan.is_none());

        assert_eq!(session.plan_completed(second, Ok("new".to_string())), PlanOutcome::Ready);
        assert_eq!(session.view().plan.as_deref(), Some("new"));
    }

    #[test]
    fn test_stale_flights_dropped() {
        let mut session = Session::new();
        let (first, _) = session.submit(&request(true)).unwrap();
        session.plan_completed(first, Ok("plan".to_string()));
        let (second, _) = session.submit(&request(false)).unwrap();
        session.plan_completed(second, Ok("plan".to_string()));

        assert!(!session.flights_completed(first, Ok(flights())));
        assert!(session.view().flights.is_none());
        assert_eq!(session.view().phase, Phase::PlanReady);
    }

    #[test]
    fn test_chat_requires_plan() {
        let mut session = Session::new();
        assert_eq!(session.begin_chat("hello?"), Err(TripError::NoItinerary));
        assert!(session.view().transcript.is_empty());
    }

    #[test]
    fn test_resubmission_clears_flights_while_loading() {
        let mut session = Session::new();
        let (first, _) = session.submit(&request(true)).unwrap();
        session.plan_completed(first, Ok("plan one".to_string()));
        assert!(session.flights_completed(first, Ok(flights())));
        assert!(session.view().flights.is_some());

        let (second, _) = session.submit(&request(true)).unwrap();
        session.plan_completed(second, Ok("plan two".to_string()));

        assert_eq!(session.view().phase, Phase::FlightsLoading);
        assert_eq!(session.view().plan.as_deref(), Some("plan two"));
        assert!(session.view().flights.is_none());
    }

    #[test]
    fn test_chat_round_trip() {
        let mut session = ready_session(false);
        let ticket = session.begin_chat("  Where to eat?\n").unwrap();
        assert_eq!(ticket.question, "  Where to eat?\n");
        assert_eq!(ticket.message.content, "  Where to eat?\n");
        assert_eq!(ticket.itinerary, "plan");
        assert!(session.view().chat_pending);

        let answer = session.chat_completed(Ok("Old Quarter.".to_string()));
        assert_eq!(answer.role, ChatRole::Assistant);
        assert_eq!(answer.content, "Old Quarter.");
        assert!(!session.view().chat_pending);
        // welcome, question, answer
        assert_eq!(session.view().transcript.len(), 3);
    }

    #[test]
    fn test_chat_failure_appends_apology() {
        let mut session = ready_session(false);
        session.begin_chat("Where to eat?").unwrap();
        let answer = session.chat_completed(Err(TripError::chat()));

        assert_eq!(answer.content, APOLOGY);
        assert_eq!(session.view().transcript.len(), 3);
    }

    #[test]
    fn test_chat_busy_appends_nothing() {
        let mut session = ready_session(false);
        session.begin_chat("first?").unwrap();

        assert_eq!(session.begin_chat("second?"), Err(TripError::ChatBusy));
        assert_eq!(session.view().transcript.len(), 2);
    }

    #[test]
    fn test_chat_does_not_touch_plan_state() {
        let mut session = ready_session(true);
        session.flights_completed(1, Ok(flights()));
        session.begin_chat("q?").unwrap();
        session.chat_completed(Err(TripError::chat()));

        assert_eq!(session.view().phase, Phase::FlightsReady);
        assert!(session.view().flights.is_some());
    }

    proptest! {
        #[test]
        fn prop_any_blank_field_rejected(field in 0usize..7, blank in "[ \t]{0,3}") {
            let mut req = request(true);
            match field {
                0 => req.source = blank.clone(),
                1 => req.destination = blank.clone(),
                2 => req.start_date = None,
                3 => req.end_date = None,
                4 => req.budget = blank.clone(),
                5 => req.travelers = blank.clone(),
                _ => req.interests = blank.clone(),
            }
            let mut session = Session::new();
            prop_assert!(session.submit(&req).is_err());
            prop_assert_eq!(session.generation(), 0);
            prop_assert_eq!(session.view().phase, Phase::Idle);
        }
    }
}
