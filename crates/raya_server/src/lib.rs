//! Raya server - REST API, persistence and orchestration around
//! [`raya_engine`].
//!
//! The layers, from the outside in:
//!
//! - [`router`] maps HTTP requests onto a [`GameService`];
//! - [`GameService`] serializes moves per game and triggers the automated
//!   reply;
//! - a [`GameStore`] keeps versioned game records, in SQLite
//!   ([`SqliteGameStore`]) or in memory ([`MemoryGameStore`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod cli;
mod config;
pub mod db;
mod service;
mod store;

pub use api::{
    ApiError, AppState, CorsPolicy, DEFAULT_HISTORY_LIMIT, HealthResponse, HistoryParams,
    MAX_HISTORY_LIMIT, MoveRequest, router,
};
pub use cli::{Cli, Command};
pub use config::{ConfigError, ServerConfig};
pub use service::{GameLocks, GameService, ServiceError};
pub use store::{GameStore, MemoryGameStore, SqliteGameStore, StoreError, StoredGame};
