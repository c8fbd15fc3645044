//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rolecall - members grant themselves roles by reacting to menus
#[derive(Parser, Debug)]
#[command(name = "rolecall")]
#[command(about = "Reaction-role bot for Discord", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file, used instead of the user config locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations, then connect to Discord and serve reactions
    Run,

    /// Apply pending database migrations and exit
    Migrate,

    /// Print the effective configuration as TOML
    ShowConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::parse_from(["rolecall", "run"]);
        assert!(matches!(cli.command, Commands::Run));
        assert!(!cli.verbose);

        let cli = Cli::parse_from(["rolecall", "show-config", "--config", "custom.toml", "-v"]);
        assert!(matches!(cli.command, Commands::ShowConfig));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["rolecall"]).is_err());
    }
}
