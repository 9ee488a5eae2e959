//! Wayfarer - AI trip planner
//!
//! Turns a trip request into a markdown itinerary, optionally pairs it with
//! one-way flight options, and answers follow-up questions about the plan.
//!
//! # Architecture
//!
//! - [`planner`] - orchestrator actor and the session state machine it owns
//! - [`itinerary`], [`flights`], [`followup`] - service clients
//! - [`llm`] - generative text backends (Gemini, Anthropic)
//! - [`prompts`] - prompt templates
//! - [`domain`] - trip, flight and chat types
//!
//! Credentials live in the `keystore` crate and are injected into the
//! clients, which read them on every call.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod display;
pub mod domain;
pub mod error;
pub mod flights;
pub mod followup;
pub mod itinerary;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod repl;

pub use config::Config;
pub use domain::{ChatMessage, ChatRole, FlightQueryResult, Trip, TripRequest, ValidationError};
pub use error::TripError;
pub use planner::{Phase, PlannerEvent, PlannerHandle, PlannerServices, ViewState};
