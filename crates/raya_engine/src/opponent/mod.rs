//! Automated move selection.
//!
//! A [`MoveSelector`] picks a cell for the automated side. Two strategies
//! are bundled: the default [`CenterThenRandom`] heuristic and an exhaustive
//! [`Negamax`] search.

mod heuristic;
mod negamax;

pub use heuristic::CenterThenRandom;
pub use negamax::Negamax;

use super::{Board, Move, MoveError, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Chooses a move for the automated side.
///
/// Only called on an in-progress board; a full board yields
/// [`MoveError::NoMovesAvailable`].
pub trait MoveSelector {
    /// Selects a move for `player` on the given board.
    fn select_move(&mut self, board: &Board, player: Player) -> Result<Move, MoveError>;
}

impl<S: MoveSelector + ?Sized> MoveSelector for Box<S> {
    fn select_move(&mut self, board: &Board, player: Player) -> Result<Move, MoveError> {
        (**self).select_move(board, player)
    }
}

/// Named opponent strategy, as chosen in configuration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Opponent {
    /// Center if free, otherwise a uniformly random empty cell.
    #[default]
    CenterRandom,
    /// Full game-tree search.
    Negamax,
}

impl Opponent {
    /// Builds a selector for this strategy, seeded from OS entropy.
    #[instrument]
    pub fn selector(self) -> Box<dyn MoveSelector + Send> {
        match self {
            Opponent::CenterRandom => Box::new(CenterThenRandom::from_entropy()),
            Opponent::Negamax => Box::new(Negamax::new()),
        }
    }
}
