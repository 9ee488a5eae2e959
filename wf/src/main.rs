//! Wayfarer - AI trip planner
//!
//! CLI entry point for planning trips, looking up flights and managing keys.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use keystore::{CredentialStore, FileKeyStore, Service};
use wayfarer::cli::{Cli, Command, KeyCommand, PlanArgs};
use wayfarer::config::Config;
use wayfarer::display;
use wayfarer::flights::{FlightClient, SerpApiClient};
use wayfarer::followup::FollowUpClient;
use wayfarer::itinerary::ItineraryClient;
use wayfarer::llm::create_client;
use wayfarer::planner::{Phase, PlannerHandle, PlannerServices};
use wayfarer::prompts::PromptLoader;
use wayfarer::repl::ChatRepl;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wayfarer")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("wayfarer.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!(provider = %config.itinerary.provider, "Wayfarer loaded config");

    debug!("main: dispatching command");
    match cli.command {
        Command::Plan(args) => cmd_plan(&config, args).await,
        Command::Flights { from, to, date } => cmd_flights(&config, &from, &to, date).await,
        Command::Key { command } => cmd_key(&config, command),
    }
}

fn open_keystore(config: &Config) -> Result<Arc<FileKeyStore>> {
    let store = FileKeyStore::open(&config.storage.keystore_path)
        .context(format!("Failed to open keystore at {}", config.storage.keystore_path.display()))?;
    Ok(Arc::new(store))
}

fn flight_client(config: &Config, store: Arc<FileKeyStore>) -> Result<FlightClient> {
    let search = SerpApiClient::from_config(&config.flights).context("Failed to create flight client")?;
    Ok(FlightClient::new(
        Arc::new(search),
        store,
        config.flights.fallback_on_transport_error,
    ))
}

fn build_planner(config: &Config) -> Result<PlannerHandle> {
    debug!("build_planner: called");
    let store = open_keystore(config)?;
    let llm = create_client(&config.itinerary).context("Failed to create itinerary client")?;
    let prompts = Arc::new(PromptLoader::new(config.prompts.dir.as_ref()));

    let services = PlannerServices {
        itinerary: ItineraryClient::new(llm.clone(), store.clone(), prompts.clone(), config.itinerary.max_tokens),
        flights: flight_client(config, store.clone())?,
        followup: FollowUpClient::new(
            llm,
            store,
            prompts,
            config.itinerary.max_tokens,
            config.chat.max_itinerary_chars,
        ),
    };

    Ok(PlannerHandle::spawn(services))
}

/// Generate a plan, optionally with flights and a follow-up chat
async fn cmd_plan(config: &Config, args: PlanArgs) -> Result<()> {
    debug!(?args, "cmd_plan: called");
    let planner = build_planner(config)?;
    let mut events = planner.subscribe_events();

    let view = planner.submit_and_settle(args.to_request()).await?;
    while let Ok(event) = events.try_recv() {
        display::print_toast(&event);
    }

    if view.phase == Phase::PlanFailed {
        let error = view.plan_error.map(|e| e.to_string()).unwrap_or_default();
        return Err(eyre::eyre!(error));
    }

    if let Some(plan) = &view.plan {
        display::print_plan(plan);
    }
    if let Some(flights) = &view.flights {
        display::print_flights(flights);
    }

    if args.chat {
        ChatRepl::new(planner.clone()).run().await?;
    }

    planner.shutdown().await;
    Ok(())
}

/// Look up flights without generating a plan
async fn cmd_flights(config: &Config, from: &str, to: &str, date: chrono::NaiveDate) -> Result<()> {
    debug!(%from, %to, %date, "cmd_flights: called");
    let client = flight_client(config, open_keystore(config)?)?;
    let result = client.lookup_flights(from, to, date).await?;
    display::print_flights(&result);
    Ok(())
}

/// Manage stored API keys
fn cmd_key(config: &Config, command: KeyCommand) -> Result<()> {
    debug!("cmd_key: called");
    let store = open_keystore(config)?;

    match command {
        KeyCommand::Set { service, value } => {
            let service: Service = service.parse()?;
            store.set(service, &value)?;
            info!(%service, "Stored API key");
            println!("{} Saved {} key", "✓".green(), service);
        }
        KeyCommand::Show => {
            for service in Service::ALL {
                let shown = match store.get(service)? {
                    Some(value) => keystore::mask(&value),
                    None => "(not set)".dimmed().to_string(),
                };
                println!("{:<10} {}", service.to_string().cyan(), shown);
            }
        }
        KeyCommand::Clear { service } => {
            let service: Service = service.parse()?;
            store.clear(service)?;
            info!(%service, "Cleared API key");
            println!("{} Cleared {} key", "✓".green(), service);
        }
    }
    Ok(())
}
