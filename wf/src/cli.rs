//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::TripRequest;

/// Wayfarer - AI trip planner
#[derive(Parser)]
#[command(
    name = "wf",
    about = "Plan a trip: itinerary, flights and follow-up questions",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a travel plan
    Plan(PlanArgs),

    /// Look up one-way flights
    Flights {
        /// Departure airport code or city
        #[arg(long)]
        from: String,

        /// Arrival airport code or city
        #[arg(long)]
        to: String,

        /// Outbound date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// Manage API keys
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },
}

/// Trip fields; missing ones are reported together with the rest of validation
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PlanArgs {
    /// Departure city or airport code
    #[arg(long, default_value = "")]
    pub from: String,

    /// Destination city or airport code
    #[arg(long, default_value = "")]
    pub to: String,

    /// First day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Budget in USD
    #[arg(long, default_value = "")]
    pub budget: String,

    /// Number of travelers
    #[arg(long, default_value = "")]
    pub travelers: String,

    /// Interests, free text
    #[arg(long, default_value = "")]
    pub interests: String,

    /// Also look up flights for the start date
    #[arg(long)]
    pub flights: bool,

    /// Open a follow-up chat once the plan is ready
    #[arg(long)]
    pub chat: bool,
}

impl PlanArgs {
    pub fn to_request(&self) -> TripRequest {
        TripRequest {
            source: self.from.clone(),
            destination: self.to.clone(),
            start_date: self.start,
            end_date: self.end,
            budget: self.budget.clone(),
            travelers: self.travelers.clone(),
            interests: self.interests.clone(),
            include_flights: self.flights,
        }
    }
}

/// API key subcommands
#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Store a key (itinerary or flights)
    Set {
        /// Service name: itinerary (gemini) or flights (serpapi)
        service: String,

        /// Key value
        value: String,
    },

    /// Show stored keys, masked
    Show,

    /// Remove a stored key
    Clear {
        /// Service name: itinerary (gemini) or flights (serpapi)
        service: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "wf",
            "plan",
            "--from",
            "DEL",
            "--to",
            "HAN",
            "--start",
            "2025-03-07",
            "--end",
            "2025-03-10",
            "--budget",
            "1500",
            "--travelers",
            "2",
            "--interests",
            "food",
            "--flights",
        ])
        .unwrap();

        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        let request = args.to_request();
        assert_eq!(request.source, "DEL");
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2025, 3, 7));
        assert!(request.include_flights);
        assert!(!args.chat);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_plan_missing_fields_parse_but_fail_validation() {
        let cli = Cli::try_parse_from(["wf", "plan", "--from", "DEL"]).unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert!(args.to_request().validate().is_err());
    }

    #[test]
    fn test_parse_key_set_and_global_flags() {
        let cli = Cli::try_parse_from(["wf", "key", "set", "flights", "serp-123", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Command::Key {
                command: KeyCommand::Set { ref service, ref value }
            } if service == "flights" && value == "serp-123"
        ));
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(Cli::try_parse_from(["wf", "flights", "--from", "DEL", "--to", "HAN", "--date", "07/03/2025"]).is_err());
    }
}
