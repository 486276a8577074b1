//! Database models and their mapping to engine games.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use raya_engine::{Board, Game, GameId, GameStatus, Player, is_valid_raw_board};
use tracing::{instrument, warn};

use crate::db::{DbError, DbErrorKind, schema};

/// Stored game row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    id: String,
    board: String,
    current_player: String,
    status: String,
    version: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Decodes the row into an engine game.
    ///
    /// An unknown board symbol, player or status is a decoding error. A
    /// board of the wrong shape decodes as stored and is left for the
    /// engine to reject.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] of kind [`DbErrorKind::Decoding`].
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn to_game(&self) -> Result<Game, DbError> {
        let id: GameId = self.id.parse().map_err(|e| {
            DbError::new(DbErrorKind::Decoding, format!("Invalid game id '{}': {}", self.id, e))
        })?;
        let raw: Vec<Vec<String>> = serde_json::from_str(&self.board).map_err(|e| {
            DbError::new(DbErrorKind::Decoding, format!("Invalid board '{}': {}", self.board, e))
        })?;
        // A misshapen board still loads; the engine refuses to move on it.
        if !is_valid_raw_board(&raw) {
            warn!(game_id = %self.id, board = %self.board, "Stored board fails validation");
        }
        let board = Board::try_from(raw).map_err(|e| {
            DbError::new(DbErrorKind::Decoding, format!("Invalid board '{}': {}", self.board, e))
        })?;
        let current_player: Player = self.current_player.parse().map_err(|_| {
            DbError::new(
                DbErrorKind::Decoding,
                format!("Invalid player '{}'", self.current_player),
            )
        })?;
        let status: GameStatus = self
            .status
            .parse()
            .map_err(|e| DbError::new(DbErrorKind::Decoding, format!("{}", e)))?;

        Ok(Game::from_parts(
            id,
            board,
            current_player,
            status,
            self.created_at.and_utc(),
            self.updated_at.and_utc(),
        ))
    }
}

/// Insertable row for a freshly created game.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow {
    id: String,
    board: String,
    current_player: String,
    status: String,
    version: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewGameRow {
    /// Encodes a game as a new row at version zero.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the board cannot be serialized.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        Ok(Self {
            id: game.id().to_string(),
            board: serde_json::to_string(game.board())?,
            current_player: game.current_player().to_string(),
            status: game.status().to_string(),
            version: 0,
            created_at: game.created_at().naive_utc(),
            updated_at: game.updated_at().naive_utc(),
        })
    }
}

/// Mutable columns written by a move.
#[derive(Debug, Clone, AsChangeset, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameChanges {
    board: String,
    current_player: String,
    status: String,
    version: i32,
    updated_at: NaiveDateTime,
}

impl GameChanges {
    /// Encodes the mutable part of a game, stamped with the next version.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the board cannot be serialized.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game, version: i32) -> Result<Self, DbError> {
        Ok(Self {
            board: serde_json::to_string(game.board())?,
            current_player: game.current_player().to_string(),
            status: game.status().to_string(),
            version,
            updated_at: game.updated_at().naive_utc(),
        })
    }
}
