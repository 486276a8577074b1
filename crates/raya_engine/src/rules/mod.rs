//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating a board. Rules are separated from the
//! move applier so they can be called for diagnostics on any board.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner};

use super::{Board, GameStatus};
use tracing::instrument;

/// Evaluates the board: a win, a draw, or still in progress.
///
/// Lines are checked rows first, then columns, then the main and anti
/// diagonals. The first complete line decides the winner.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> GameStatus {
    if let Some(winner) = check_winner(board) {
        GameStatus::Won(winner)
    } else if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}
