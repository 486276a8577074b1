//! Game orchestration: storage, per-game serialization, automated replies.

use crate::store::{GameStore, StoreError, StoredGame};
use raya_engine::{
    Game, GameId, GameStatus, MoveError, MoveSelector, Player, apply_automated_move, apply_move,
    create_game,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

/// Error from a service operation.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ServiceError {
    /// The engine rejected the move.
    #[display("{}", _0)]
    Move(MoveError),

    /// Storage failed or the game does not exist.
    #[display("{}", _0)]
    Store(StoreError),

    /// A blocking storage task did not complete.
    #[display("Storage task failed: {}", message)]
    #[from(ignore)]
    Task {
        /// Join failure description.
        message: String,
    },
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Move(err) => Some(err),
            ServiceError::Store(err) => Some(err),
            ServiceError::Task { .. } => None,
        }
    }
}

/// One async mutex per game id.
///
/// Moves on the same game run one at a time; moves on different games do
/// not wait for each other.
#[derive(Debug, Clone, Default)]
pub struct GameLocks {
    locks: Arc<StdMutex<HashMap<GameId, Arc<Mutex<()>>>>>,
}

impl GameLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the given game.
    #[instrument(skip(self))]
    pub async fn acquire(&self, id: GameId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop entries nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of games currently tracked.
    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Runs games against a [`GameStore`].
pub struct GameService {
    store: Arc<dyn GameStore>,
    locks: GameLocks,
    selector: Mutex<Box<dyn MoveSelector + Send>>,
    automated: Player,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("automated", &self.automated)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl GameService {
    /// Creates a service.
    ///
    /// `automated` is the side played by `selector`.
    #[instrument(skip(store, selector))]
    pub fn new(
        store: Arc<dyn GameStore>,
        selector: Box<dyn MoveSelector + Send>,
        automated: Player,
    ) -> Self {
        info!(automated = %automated, "Creating game service");
        Self {
            store,
            locks: GameLocks::new(),
            selector: Mutex::new(selector),
            automated,
        }
    }

    /// The side played by the automated opponent.
    pub fn automated_side(&self) -> Player {
        self.automated
    }

    /// Runs a storage call on the blocking pool.
    async fn with_store<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GameStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| ServiceError::Task {
                message: e.to_string(),
            })?
            .map_err(ServiceError::from)
    }

    async fn load(&self, id: GameId) -> Result<StoredGame, ServiceError> {
        self.with_store(move |store| store.get(id)).await
    }

    async fn save(&self, game: Game, version: i32) -> Result<StoredGame, ServiceError> {
        self.with_store(move |store| store.update(&game, version)).await
    }

    /// Creates and stores a new game.
    #[instrument(skip(self))]
    pub async fn create(&self) -> Result<Game, ServiceError> {
        let game = create_game();
        let stored = self.with_store(move |store| store.insert(&game)).await?;
        Ok(stored.into_game())
    }

    /// Loads a game.
    #[instrument(skip(self))]
    pub async fn find(&self, id: GameId) -> Result<Game, ServiceError> {
        Ok(self.load(id).await?.into_game())
    }

    /// All games, most recent first.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Game>, ServiceError> {
        self.with_store(|store| store.list(None, None)).await
    }

    /// The `limit` most recent games, optionally with the given status.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        limit: usize,
        status: Option<GameStatus>,
    ) -> Result<Vec<Game>, ServiceError> {
        self.with_store(move |store| store.list(Some(limit), status))
            .await
    }

    /// Plays a human move, then the automated reply if the game goes on and
    /// it is the automated side's turn.
    ///
    /// A move that ends the game is returned without a reply.
    #[instrument(skip(self))]
    pub async fn play(&self, id: GameId, row: usize, col: usize) -> Result<Game, ServiceError> {
        let _guard = self.locks.acquire(id).await;

        let stored = self.load(id).await?;
        let after_human = apply_move(stored.game(), row, col)?;
        let stored = self.save(after_human, *stored.version()).await?;

        let game = stored.game();
        if game.status() != GameStatus::InProgress || game.current_player() != self.automated {
            debug!(status = %game.status(), to_move = %game.current_player(), "No automated reply");
            return Ok(stored.into_game());
        }

        let reply = {
            let mut selector = self.selector.lock().await;
            apply_automated_move(game, self.automated, &mut **selector)?
        };
        let stored = self.save(reply, *stored.version()).await?;
        info!(status = %stored.game().status(), "Automated reply played");
        Ok(stored.into_game())
    }

    /// Plays one move for the automated side.
    #[instrument(skip(self))]
    pub async fn play_automated(&self, id: GameId) -> Result<Game, ServiceError> {
        let _guard = self.locks.acquire(id).await;

        let stored = self.load(id).await?;
        let next = {
            let mut selector = self.selector.lock().await;
            apply_automated_move(stored.game(), self.automated, &mut **selector).inspect_err(
                |err| warn!(kind = err.kind(), error = %err, "Automated move rejected"),
            )?
        };
        Ok(self.save(next, *stored.version()).await?.into_game())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_released_locks_are_pruned() {
        let locks = GameLocks::new();
        let first = GameId::new();
        drop(locks.acquire(first).await);
        assert_eq!(locks.tracked(), 1);

        let _held = locks.acquire(GameId::new()).await;
        assert_eq!(locks.tracked(), 1);
    }

    #[tokio::test]
    async fn test_same_game_waits() {
        let locks = GameLocks::new();
        let id = GameId::new();
        let guard = locks.acquire(id).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire(id).await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }
}
