//! Center-then-random opponent.

use super::MoveSelector;
use crate::{Board, Move, MoveError, Player};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

const CENTER: Move = Move { row: 1, col: 1 };

/// Takes the center when it is free, otherwise a uniformly random empty
/// cell.
///
/// This is a placeholder heuristic: it does not block the opponent and does
/// not look for forced wins.
#[derive(Debug, Clone)]
pub struct CenterThenRandom<R = SmallRng> {
    rng: R,
}

impl CenterThenRandom<SmallRng> {
    /// Creates a selector seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Creates a selector with a fixed seed, for reproducible games.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> CenterThenRandom<R> {
    /// Creates a selector drawing from the given generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for CenterThenRandom<SmallRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> MoveSelector for CenterThenRandom<R> {
    #[instrument(skip(self, board))]
    fn select_move(&mut self, board: &Board, _player: Player) -> Result<Move, MoveError> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return Err(MoveError::NoMovesAvailable);
        }

        if board.is_empty_at(CENTER.row, CENTER.col) {
            debug!("Center is free");
            return Ok(CENTER);
        }

        let choice = Move::from(empty[self.rng.random_range(0..empty.len())]);
        debug!(row = choice.row, col = choice.col, candidates = empty.len(), "Random empty cell");
        Ok(choice)
    }
}
