//! Storage boundary for game records.
//!
//! Every stored game carries a version that is bumped on each write. An
//! update names the version it was computed from and fails with
//! [`StoreError::Conflict`] if somebody else wrote in between.

mod memory;
mod sqlite;

pub use memory::MemoryGameStore;
pub use sqlite::SqliteGameStore;

use crate::db::DbError;
use derive_getters::Getters;
use derive_new::new;
use raya_engine::{Game, GameId, GameStatus};

/// A game together with its storage version.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct StoredGame {
    game: Game,
    version: i32,
}

impl StoredGame {
    /// Consumes the record, returning the game.
    pub fn into_game(self) -> Game {
        self.game
    }
}

/// Error raised at the storage boundary.
#[derive(Debug, Clone, derive_more::Display)]
pub enum StoreError {
    /// No game with this id.
    #[display("Game not found")]
    NotFound {
        /// Requested id.
        id: GameId,
    },

    /// The game changed since it was read.
    #[display("Game {} was modified concurrently", id)]
    Conflict {
        /// Contested id.
        id: GameId,
    },

    /// A stored record cannot be turned back into a game.
    #[display("Invalid game state: {}", reason)]
    Corrupted {
        /// What was wrong with the record.
        reason: String,
    },

    /// The database failed.
    #[display("{}", _0)]
    Db(DbError),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Db(err) => Some(err),
            _ => None,
        }
    }
}

/// Storage for game records.
///
/// Implementations are synchronous; async callers run them on a blocking
/// thread.
pub trait GameStore: Send + Sync + 'static {
    /// Stores a newly created game at version zero.
    fn insert(&self, game: &Game) -> Result<StoredGame, StoreError>;

    /// Loads a game.
    fn get(&self, id: GameId) -> Result<StoredGame, StoreError>;

    /// Lists games, most recent first, optionally filtered by status and
    /// capped at `limit`.
    fn list(&self, limit: Option<usize>, status: Option<GameStatus>)
    -> Result<Vec<Game>, StoreError>;

    /// Replaces a game if its stored version is still `expected_version`.
    fn update(&self, game: &Game, expected_version: i32) -> Result<StoredGame, StoreError>;
}
