//! PlannerHandle - actor that owns the planning Session
//!
//! Front ends send commands over a channel. Service calls run in spawned
//! tasks and post their results back as commands, so every state change
//! happens on the actor loop in arrival order.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{ChatMessage, FlightQueryResult, TripRequest};
use crate::error::TripError;
use crate::flights::FlightClient;
use crate::followup::FollowUpClient;
use crate::itinerary::ItineraryClient;

use super::messages::{PlannerCommand, PlannerEvent, PlannerResponse};
use super::session::{FlightRequest, PlanOutcome, Session, ViewState};

/// The three service clients the planner sequences
pub struct PlannerServices {
    pub itinerary: ItineraryClient,
    pub flights: FlightClient,
    pub followup: FollowUpClient,
}

/// Handle to send commands to the planner actor
#[derive(Clone)]
pub struct PlannerHandle {
    tx: mpsc::Sender<PlannerCommand>,
    /// Broadcast sender for phase change notifications
    event_tx: broadcast::Sender<PlannerEvent>,
}

impl PlannerHandle {
    /// Spawn a new planner actor
    pub fn spawn(services: PlannerServices) -> Self {
        debug!("spawn: called");
        let (tx, rx) = mpsc::channel(64);
        let (event_tx, _) = broadcast::channel(64);

        let actor = Actor {
            session: Session::new(),
            services: Arc::new(services),
            self_tx: tx.downgrade(),
            event_tx: event_tx.clone(),
            chat_reply: None,
        };
        tokio::spawn(actor.run(rx));

        info!("Planner spawned");
        Self { tx, event_tx }
    }

    /// Subscribe to phase change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlannerEvent> {
        self.event_tx.subscribe()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> PlannerCommand,
    ) -> PlannerResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(make(reply_tx)).await.map_err(|_| TripError::Channel)?;
        reply_rx.await.map_err(|_| TripError::Channel)
    }

    /// Submit a trip; returns its generation once the plan request is in flight
    pub async fn submit(&self, request: TripRequest) -> PlannerResponse<u64> {
        debug!(destination = %request.destination, "submit: called");
        self.request(|reply| PlannerCommand::Submit { request, reply }).await?
    }

    /// Submit a trip and wait until its plan (and flights, if requested) have landed
    pub async fn submit_and_settle(&self, request: TripRequest) -> PlannerResponse<ViewState> {
        debug!(destination = %request.destination, "submit_and_settle: called");
        let mut events = self.subscribe_events();
        let generation = self.submit(request).await?;

        loop {
            match events.recv().await {
                Ok(event) if event.ends(generation) => break,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(%skipped, "submit_and_settle: event receiver lagged");
                    let view = self.snapshot().await?;
                    if view.generation != generation || !view.phase.is_busy() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return Err(TripError::Channel),
            }
        }

        self.snapshot().await
    }

    /// Ask a follow-up question about the current plan
    ///
    /// Resolves with the assistant message appended for it, which is the
    /// apology text when the service call failed.
    pub async fn ask(&self, question: impl Into<String>) -> PlannerResponse<ChatMessage> {
        let question = question.into();
        debug!(question_len = question.len(), "ask: called");
        self.request(|reply| PlannerCommand::Ask { question, reply }).await?
    }

    /// Copy of the current view state
    pub async fn snapshot(&self) -> PlannerResponse<ViewState> {
        debug!("snapshot: called");
        self.request(|reply| PlannerCommand::Snapshot { reply }).await
    }

    /// Stop the actor; in-flight results are discarded
    pub async fn shutdown(&self) {
        debug!("shutdown: called");
        let _ = self.tx.send(PlannerCommand::Shutdown).await;
    }
}

struct Actor {
    session: Session,
    services: Arc<PlannerServices>,
    /// Weak so the actor stops once every handle is dropped
    self_tx: mpsc::WeakSender<PlannerCommand>,
    event_tx: broadcast::Sender<PlannerEvent>,
    /// Reply for the one outstanding follow-up question
    chat_reply: Option<oneshot::Sender<PlannerResponse<ChatMessage>>>,
}

impl Actor {
    async fn run(mut self, mut rx: mpsc::Receiver<PlannerCommand>) {
        debug!("Planner actor started");

        while let Some(cmd) = rx.recv().await {
            match cmd {
                PlannerCommand::Submit { request, reply } => self.on_submit(request, reply),
                PlannerCommand::Ask { question, reply } => self.on_ask(question, reply),
                PlannerCommand::Snapshot { reply } => {
                    let _ = reply.send(self.session.view().clone());
                }
                PlannerCommand::Shutdown => {
                    debug!("actor_loop: Shutdown command");
                    break;
                }
                PlannerCommand::PlanCompleted { generation, result } => self.on_plan(generation, result),
                PlannerCommand::FlightsCompleted { generation, result } => self.on_flights(generation, result),
                PlannerCommand::ChatCompleted { result } => {
                    let error = result.as_ref().err().cloned();
                    let message = self.session.chat_completed(result);
                    match error {
                        Some(error) => self.emit(PlannerEvent::ChatFailed { error }),
                        None => self.emit(PlannerEvent::ChatAnswered {
                            message: message.clone(),
                        }),
                    }
                    if let Some(reply) = self.chat_reply.take() {
                        let _ = reply.send(Ok(message));
                    }
                }
            }
        }

        debug!("Planner actor stopped");
    }

    fn emit(&self, event: PlannerEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn on_submit(&mut self, request: TripRequest, reply: oneshot::Sender<PlannerResponse<u64>>) {
        debug!("actor_loop: Submit command");
        let previous = self.session.generation();
        let was_busy = self.session.view().phase.is_busy();

        let (generation, trip) = match self.session.submit(&request) {
            Ok(accepted) => accepted,
            Err(e) => {
                debug!(error = %e, "actor_loop: Submit rejected");
                let _ = reply.send(Err(e.into()));
                return;
            }
        };

        if was_busy {
            info!(generation = %previous, "Superseded by a newer submission");
            self.emit(PlannerEvent::Superseded { generation: previous });
        }

        let Some(tx) = self.self_tx.upgrade() else {
            let _ = reply.send(Err(TripError::Channel));
            return;
        };
        let services = self.services.clone();
        tokio::spawn(async move {
            let result = services.itinerary.generate_plan(&trip).await;
            let _ = tx.send(PlannerCommand::PlanCompleted { generation, result }).await;
        });

        self.emit(PlannerEvent::Submitted { generation });
        let _ = reply.send(Ok(generation));
    }

    fn on_plan(&mut self, generation: u64, result: Result<String, TripError>) {
        debug!(%generation, "actor_loop: PlanCompleted command");
        match self.session.plan_completed(generation, result) {
            PlanOutcome::Stale => {}
            PlanOutcome::Ready => {
                self.emit_plan_ready(generation);
                self.emit(PlannerEvent::Settled { generation });
            }
            PlanOutcome::LookupFlights(request) => {
                self.emit_plan_ready(generation);
                self.emit(PlannerEvent::FlightsLoading { generation });
                self.spawn_flights(request);
            }
            PlanOutcome::Failed(error) => {
                warn!(%generation, %error, "Plan generation failed");
                self.emit(PlannerEvent::PlanFailed { generation, error });
                self.emit(PlannerEvent::Settled { generation });
            }
        }
    }

    fn emit_plan_ready(&self, generation: u64) {
        let destination = self.session.view().destination.clone().unwrap_or_default();
        info!(%generation, %destination, "Plan ready");
        self.emit(PlannerEvent::PlanReady {
            generation,
            destination,
        });
    }

    fn on_flights(&mut self, generation: u64, result: Result<FlightQueryResult, TripError>) {
        debug!(%generation, "actor_loop: FlightsCompleted command");
        let summary = result.as_ref().map(|r| (r.len(), r.origin)).map_err(|e| e.clone());
        if !self.session.flights_completed(generation, result) {
            return;
        }

        match summary {
            Ok((count, origin)) => {
                info!(%generation, %count, ?origin, "Flights ready");
                self.emit(PlannerEvent::FlightsReady {
                    generation,
                    count,
                    origin,
                });
            }
            Err(error) => {
                warn!(%generation, %error, "Flight lookup failed");
                self.emit(PlannerEvent::FlightsFailed { generation, error });
            }
        }
        self.emit(PlannerEvent::Settled { generation });
    }

    fn spawn_flights(&mut self, request: FlightRequest) {
        let FlightRequest {
            generation,
            source,
            destination,
            date,
        } = request;

        let Some(tx) = self.self_tx.upgrade() else {
            self.on_flights(generation, Err(TripError::Channel));
            return;
        };
        let services = self.services.clone();
        tokio::spawn(async move {
            let result = services.flights.lookup_flights(&source, &destination, date).await;
            let _ = tx.send(PlannerCommand::FlightsCompleted { generation, result }).await;
        });
    }

    fn on_ask(&mut self, question: String, reply: oneshot::Sender<PlannerResponse<ChatMessage>>) {
        debug!("actor_loop: Ask command");
        let ticket = match self.session.begin_chat(&question) {
            Ok(ticket) => ticket,
            Err(e) => {
                debug!(error = %e, "actor_loop: Ask rejected");
                let _ = reply.send(Err(e));
                return;
            }
        };

        let Some(tx) = self.self_tx.upgrade() else {
            let message = self.session.chat_completed(Err(TripError::Channel));
            let _ = reply.send(Ok(message));
            return;
        };
        self.chat_reply = Some(reply);
        let services = self.services.clone();
        tokio::spawn(async move {
            let result = services.followup.ask(&ticket.question, &ticket.itinerary).await;
            let _ = tx.send(PlannerCommand::ChatCompleted { result }).await;
        });
    }
}
