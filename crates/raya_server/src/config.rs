//! Server configuration.
//!
//! Values come from an optional TOML file and are then overridden by
//! environment variables (`PORT`, `HOST`, `DATABASE_URL`, `CORS_ORIGIN`,
//! `RAYA_OPPONENT`, `RAYA_AUTOMATED_SIDE`, `RAYA_LOG`).

use derive_getters::Getters;
use derive_more::{Display, Error};
use raya_engine::{Opponent, Player};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// SQLite database path.
    database_url: String,
    /// Origin allowed to call the API from a browser.
    cors_origin: String,
    /// Strategy of the automated opponent.
    opponent: Opponent,
    /// Side the automated opponent plays.
    automated_side: Player,
    /// Default tracing filter when `RUST_LOG` is unset.
    log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            database_url: "raya.db".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            opponent: Opponent::default(),
            automated_side: Player::O,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads the file if given, else defaults, then applies the process
    /// environment.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database_url,
            opponent = %config.opponent,
            "Config loaded"
        );
        Ok(config)
    }

    /// Overrides fields from variables found by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::new(format!("Invalid PORT: {}", port)))?;
        }
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.cors_origin = origin;
        }
        if let Some(opponent) = lookup("RAYA_OPPONENT") {
            self.opponent = opponent
                .trim()
                .parse()
                .map_err(|_| ConfigError::new(format!("Unknown opponent: {}", opponent)))?;
        }
        if let Some(side) = lookup("RAYA_AUTOMATED_SIDE") {
            self.automated_side = side
                .trim()
                .parse()
                .map_err(|_| ConfigError::new(format!("Invalid automated side: {}", side)))?;
        }
        if let Some(level) = lookup("RAYA_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Overrides the bind address from command-line flags.
    pub fn with_bind(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
