//! Database repository for game records.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, GameChanges, GameRow, NewGameRow, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on another writer's lock before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for game records.
///
/// Opens a fresh SQLite connection per operation.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Connection, "Empty database path"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    ///
    /// Connections wait up to [`BUSY_TIMEOUT_MS`] for a concurrent writer
    /// instead of failing with "database is locked".
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Switches the database to write-ahead logging so readers do not block
    /// the writer. The setting persists in the database file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the pragma fails.
    #[instrument(skip(self))]
    pub fn enable_wal(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        info!("Write-ahead logging enabled");
        Ok(())
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts a new game row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the id already exists or a database error occurs.
    #[instrument(skip(self, row), fields(game_id = %row.id()))]
    pub fn insert(&self, row: NewGameRow) -> Result<GameRow, DbError> {
        debug!("Inserting game");
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::games::table)
            .values(&row)
            .returning(GameRow::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = %stored.id(), "Game inserted");
        Ok(stored)
    }

    /// Gets a game row by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: &str) -> Result<Option<GameRow>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::games::table
            .find(id)
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = row.is_some(), "Game lookup");
        Ok(row)
    }

    /// Lists all games, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Result<Vec<GameRow>, DbError> {
        let mut conn = self.connection()?;

        let rows = schema::games::table
            .order(schema::games::created_at.desc())
            .select(GameRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Games loaded");
        Ok(rows)
    }

    /// Lists at most `limit` games after skipping `offset`, most recent
    /// first, optionally only those with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn history(
        &self,
        limit: i64,
        offset: i64,
        status: Option<&str>,
    ) -> Result<Vec<GameRow>, DbError> {
        let mut conn = self.connection()?;

        let mut query = schema::games::table
            .order(schema::games::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(GameRow::as_select())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(schema::games::status.eq(status.to_string()));
        }

        let rows = query.load(&mut conn)?;
        info!(count = rows.len(), limit, offset, status = ?status, "Game history loaded");
        Ok(rows)
    }

    /// Writes new column values if the stored version still equals
    /// `expected_version`.
    ///
    /// Returns `None` when no row matched: either the game does not exist or
    /// another writer got there first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, changes), fields(version = changes.version()))]
    pub fn update_if_version(
        &self,
        id: &str,
        expected_version: i32,
        changes: &GameChanges,
    ) -> Result<Option<GameRow>, DbError> {
        let mut conn = self.connection()?;

        let target = schema::games::table
            .filter(schema::games::id.eq(id))
            .filter(schema::games::version.eq(expected_version));

        let updated = diesel::update(target)
            .set(changes)
            .returning(GameRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        match &updated {
            Some(row) => info!(game_id = %row.id(), version = row.version(), "Game updated"),
            None => debug!(game_id = %id, expected_version, "No row at expected version"),
        }
        Ok(updated)
    }
}
