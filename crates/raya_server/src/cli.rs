//! Command-line interface for the raya server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Raya - Tic-tac-toe game server with an automated opponent
#[derive(Parser, Debug)]
#[command(name = "raya")]
#[command(about = "Tic-tac-toe REST server with an automated opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Keep games in memory instead of SQLite
        #[arg(long)]
        memory: bool,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::parse_from(["raya", "serve", "--port", "8080", "--memory"]);
        match cli.command {
            Command::Serve {
                port, memory, host, ..
            } => {
                assert_eq!(port, Some(8080));
                assert!(memory);
                assert_eq!(host, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::parse_from(["raya", "migrate", "-c", "raya.toml"]);
        assert!(matches!(cli.command, Command::Migrate { config: Some(_) }));
    }
}
