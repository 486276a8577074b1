//! SQLite-backed game store.

use super::{GameStore, StoreError, StoredGame};
use crate::db::{DbError, DbErrorKind, GameChanges, GameRepository, GameRow, NewGameRow};
use raya_engine::{Game, GameId, GameStatus};
use tracing::{error, instrument, warn};

/// Game store over [`GameRepository`].
#[derive(Debug, Clone)]
pub struct SqliteGameStore {
    repo: GameRepository,
}

impl SqliteGameStore {
    /// Wraps a repository.
    pub fn new(repo: GameRepository) -> Self {
        Self { repo }
    }

    /// Opens the database at `db_path`, switches it to write-ahead logging
    /// and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repo = GameRepository::new(db_path)?;
        repo.enable_wal()?;
        repo.run_migrations()?;
        Ok(Self { repo })
    }
}

fn decode(row: &GameRow) -> Result<StoredGame, StoreError> {
    let game = row.to_game().map_err(|err| match err.kind {
        DbErrorKind::Decoding => {
            warn!(game_id = %row.id(), detail = %err.message, "Corrupted game record");
            StoreError::Corrupted {
                reason: "Corrupted board".to_string(),
            }
        }
        _ => StoreError::Db(err),
    })?;
    Ok(StoredGame::new(game, *row.version()))
}

/// Decodes rows, skipping records that cannot be turned back into games.
fn decode_valid(rows: &[GameRow]) -> Result<Vec<Game>, StoreError> {
    let mut games = Vec::with_capacity(rows.len());
    for row in rows {
        match decode(row) {
            Ok(stored) => games.push(stored.into_game()),
            // Already logged; listings skip damaged records.
            Err(StoreError::Corrupted { .. }) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(games)
}

fn db(err: DbError) -> StoreError {
    error!(error = %err, "Database failure");
    StoreError::Db(err)
}

impl GameStore for SqliteGameStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn insert(&self, game: &Game) -> Result<StoredGame, StoreError> {
        let row = NewGameRow::from_game(game).map_err(db)?;
        let stored = self.repo.insert(row).map_err(db)?;
        decode(&stored)
    }

    #[instrument(skip(self))]
    fn get(&self, id: GameId) -> Result<StoredGame, StoreError> {
        let row = self
            .repo
            .find_by_id(&id.to_string())
            .map_err(db)?
            .ok_or(StoreError::NotFound { id })?;
        decode(&row)
    }

    #[instrument(skip(self))]
    fn list(
        &self,
        limit: Option<usize>,
        status: Option<GameStatus>,
    ) -> Result<Vec<Game>, StoreError> {
        let status = status.map(GameStatus::as_str);
        let Some(limit) = limit else {
            let rows = match status {
                None => self.repo.list_all(),
                Some(status) => self.repo.history(i64::MAX, 0, Some(status)),
            }
            .map_err(db)?;
            return decode_valid(&rows);
        };

        // Damaged rows are skipped after the SQL limit applies, so keep
        // paging until `limit` valid games are found or rows run out.
        let page = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut games = Vec::new();
        let mut offset = 0;
        while games.len() < limit {
            let rows = self.repo.history(page, offset, status).map_err(db)?;
            games.extend(decode_valid(&rows)?);
            if (rows.len() as i64) < page {
                break;
            }
            offset = offset.saturating_add(page);
        }
        games.truncate(limit);
        Ok(games)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn update(&self, game: &Game, expected_version: i32) -> Result<StoredGame, StoreError> {
        let id = game.id();
        let changes = GameChanges::from_game(game, expected_version + 1).map_err(db)?;

        match self
            .repo
            .update_if_version(&id.to_string(), expected_version, &changes)
            .map_err(db)?
        {
            Some(row) => decode(&row),
            None => {
                // Tell a lost race apart from a missing game.
                if self.repo.find_by_id(&id.to_string()).map_err(db)?.is_some() {
                    warn!(expected_version, "Version conflict");
                    Err(StoreError::Conflict { id })
                } else {
                    Err(StoreError::NotFound { id })
                }
            }
        }
    }
}
