//! Rolecall CLI binary.
//!
//! - Run the reaction-role bot
//! - Apply database migrations
//! - Inspect the effective configuration

use clap::Parser;
use rolecall::RolecallConfig;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, migrate, run_bot, show_config};

    // Secrets may live in .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RolecallConfig::from_file(path)?,
        None => RolecallConfig::load()?,
    };

    // RUST_LOG wins over the configured filter
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run => run_bot(&config).await?,
        Commands::Migrate => migrate().await?,
        Commands::ShowConfig => show_config(&config)?,
    }

    Ok(())
}
