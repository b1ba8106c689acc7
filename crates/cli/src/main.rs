use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatfill_core::{
    load_config, validate_config, Config, Simulator, SimulatorMode, SqliteBookingStore,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(
    name = "seatfill",
    version,
    about = "Synthetic workload generator for a ticket booking datastore"
)]
struct Cli {
    /// Only generate tickets and status updates, against pre-existing
    /// users and movies
    #[arg(long)]
    tickets_only: bool,

    /// Path to the configuration file (overrides SEATFILL_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = resolve_config(&cli)?;

    // CLI flag and env override the configured mode and speed
    if cli.tickets_only {
        config.simulator.mode = SimulatorMode::TicketsOnly;
    }
    if let Ok(speed) = std::env::var("SPEED_FACTOR") {
        config.simulator.speed_factor = speed
            .parse()
            .with_context(|| format!("SPEED_FACTOR must be numeric, got {:?}", speed))?;
    }

    validate_config(&config).context("Configuration validation failed")?;

    info!("seatfill {} starting", VERSION);
    info!("Database path: {:?}", config.database.path);
    info!(
        "Mode: {:?}, speed factor: {}",
        config.simulator.mode, config.simulator.speed_factor
    );

    let store = Arc::new(
        SqliteBookingStore::new(&config.database.path).context("Failed to open booking store")?,
    );

    // Tickets-only mode is pointless against empty reference tables; fail
    // fast before any worker starts.
    if config.simulator.mode == SimulatorMode::TicketsOnly {
        Simulator::check_reference_data(store.as_ref())
            .context("Tickets-only precondition failed")?;
    }

    let simulator =
        Simulator::new(config.simulator.clone(), store).context("Failed to create simulator")?;
    simulator.start().await;

    // Idle until interrupted; the workers do all the work.
    shutdown_signal().await;
    info!("Shutdown requested");
    simulator.stop().await;

    match simulator.status() {
        Ok(status) => info!(
            "Final counts: {} users, {} movies, {}/{}/{} tickets (scheduled/live/finished)",
            status.users,
            status.movies,
            status.scheduled_tickets,
            status.live_tickets,
            status.finished_tickets
        ),
        Err(e) => warn!("Could not read final counts: {}", e),
    }

    Ok(())
}

/// An explicitly named config file must exist; the implicit default file is
/// optional and missing means built-in defaults.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let explicit = cli
        .config
        .clone()
        .or_else(|| std::env::var("SEATFILL_CONFIG").ok().map(PathBuf::from));

    if let Some(path) = explicit {
        info!("Loading configuration from {:?}", path);
        return load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let default_path = PathBuf::from("seatfill.toml");
    if default_path.exists() {
        info!("Loading configuration from {:?}", default_path);
        Ok(load_config(&default_path)?)
    } else {
        Ok(Config::default())
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tickets_only_flag() {
        let cli = Cli::try_parse_from(["seatfill", "--tickets-only"]).unwrap();
        assert!(cli.tickets_only);
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["seatfill"]).unwrap();
        assert!(!cli.tickets_only);
    }

    #[test]
    fn test_config_flag_takes_a_path() {
        let cli = Cli::try_parse_from(["seatfill", "--config", "/tmp/s.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.toml")));
    }
}
