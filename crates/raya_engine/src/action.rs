//! Move coordinates and move errors.

use super::Player;
use serde::{Deserialize, Serialize};

/// A target cell, addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Row index, top to bottom.
    pub row: usize,
    /// Column index, left to right.
    pub col: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Move {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Error that can occur when applying or selecting a move.
///
/// None of these are fatal; each one describes a caller input or
/// sequencing problem and the game is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game already ended.
    #[display("Game is already finished")]
    GameFinished,

    /// Row or column outside `0..=2`.
    #[display("Invalid move: Position ({}, {}) out of bounds", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a mark.
    #[display("Invalid move: Cell ({}, {}) is already occupied", row, col)]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The board does not have the 3x3 shape or holds an unknown symbol.
    #[display("Invalid game state: Corrupted board")]
    CorruptedState,

    /// An automated move was requested while the other side is to move.
    #[display("Not the automated player's turn ({} is to move)", _0)]
    NotAutomatedTurn(Player),

    /// An automated move was requested on a full board.
    #[display("No valid moves available")]
    NoMovesAvailable,
}

impl MoveError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::GameFinished => "GameFinished",
            MoveError::OutOfBounds { .. } => "OutOfBounds",
            MoveError::CellOccupied { .. } => "CellOccupied",
            MoveError::CorruptedState => "CorruptedState",
            MoveError::NotAutomatedTurn(_) => "NotAutomatedTurn",
            MoveError::NoMovesAvailable => "NoMovesAvailable",
        }
    }
}

impl std::error::Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_variant() {
        assert_eq!(MoveError::GameFinished.kind(), "GameFinished");
        assert_eq!(MoveError::CellOccupied { row: 1, col: 2 }.kind(), "CellOccupied");
        assert_eq!(MoveError::NotAutomatedTurn(Player::X).kind(), "NotAutomatedTurn");
    }
}
