//! In-process game store.

use super::{GameStore, StoreError, StoredGame};
use raya_engine::{Game, GameId, GameStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Keeps games in a shared map. Used for tests and `--memory` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryGameStore {
    games: Arc<Mutex<HashMap<GameId, StoredGame>>>,
}

impl MemoryGameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    fn games(&self) -> MutexGuard<'_, HashMap<GameId, StoredGame>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a record as-is, replacing any previous one.
    ///
    /// Lets tests plant records that the engine would never produce.
    pub fn put_raw(&self, record: StoredGame) {
        self.games().insert(record.game().id(), record);
    }
}

impl GameStore for MemoryGameStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn insert(&self, game: &Game) -> Result<StoredGame, StoreError> {
        let record = StoredGame::new(game.clone(), 0);
        self.games().insert(game.id(), record.clone());
        debug!("Game stored");
        Ok(record)
    }

    #[instrument(skip(self))]
    fn get(&self, id: GameId) -> Result<StoredGame, StoreError> {
        self.games()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    #[instrument(skip(self))]
    fn list(
        &self,
        limit: Option<usize>,
        status: Option<GameStatus>,
    ) -> Result<Vec<Game>, StoreError> {
        let mut games: Vec<Game> = self
            .games()
            .values()
            .filter(|record| status.is_none_or(|s| record.game().status() == s))
            .map(|record| record.game().clone())
            .collect();
        games.sort_by_key(|game| std::cmp::Reverse(game.created_at()));
        if let Some(limit) = limit {
            games.truncate(limit);
        }
        Ok(games)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn update(&self, game: &Game, expected_version: i32) -> Result<StoredGame, StoreError> {
        let mut games = self.games();
        let id = game.id();
        let current = games.get(&id).ok_or(StoreError::NotFound { id })?;

        if *current.version() != expected_version {
            warn!(expected_version, stored_version = current.version(), "Version conflict");
            return Err(StoreError::Conflict { id });
        }

        let record = StoredGame::new(game.clone(), expected_version + 1);
        games.insert(id, record.clone());
        Ok(record)
    }
}
