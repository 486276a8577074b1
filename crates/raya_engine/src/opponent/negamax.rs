//! Exhaustive negamax opponent.
//!
//! The 3x3 game tree is small enough to search completely, so this selector
//! never loses a game it can still draw and always takes a forced win.

use super::MoveSelector;
use crate::rules::evaluate;
use crate::{Board, Cell, GameStatus, Move, MoveError, Player};
use tracing::{debug, instrument};

/// Score of a win found at depth zero; deeper wins score less.
const WIN_SCORE: i32 = 10;

/// Perfect-play selector.
///
/// Prefers faster wins and slower losses. Among equally scored moves the
/// center is preferred, then row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Negamax;

impl Negamax {
    /// Creates a new negamax selector.
    pub fn new() -> Self {
        Self
    }
}

/// Empty cells with the center first.
fn ordered_candidates(board: &Board) -> Vec<(usize, usize)> {
    let mut cells = board.empty_cells();
    if let Some(idx) = cells.iter().position(|&cell| cell == (1, 1)) {
        let center = cells.remove(idx);
        cells.insert(0, center);
    }
    cells
}

fn negamax(board: &mut Board, to_move: Player, depth: i32) -> i32 {
    match evaluate(board) {
        GameStatus::Won(winner) if winner == to_move => WIN_SCORE - depth,
        GameStatus::Won(_) => depth - WIN_SCORE,
        GameStatus::Draw => 0,
        GameStatus::InProgress => {
            let mut best = i32::MIN;
            for (row, col) in ordered_candidates(board) {
                board.set(row, col, Cell::Mark(to_move));
                let score = -negamax(board, to_move.opponent(), depth + 1);
                board.set(row, col, Cell::Empty);
                best = best.max(score);
            }
            best
        }
    }
}

impl MoveSelector for Negamax {
    #[instrument(skip(self, board))]
    fn select_move(&mut self, board: &Board, me: Player) -> Result<Move, MoveError> {
        let candidates = ordered_candidates(board);
        if candidates.is_empty() {
            return Err(MoveError::NoMovesAvailable);
        }

        let mut scratch = board.clone();
        let mut best: Option<(i32, Move)> = None;

        for (row, col) in candidates {
            scratch.set(row, col, Cell::Mark(me));
            let score = -negamax(&mut scratch, me.opponent(), 1);
            scratch.set(row, col, Cell::Empty);

            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, Move::new(row, col)));
            }
        }

        let (score, chosen) = best.ok_or(MoveError::NoMovesAvailable)?;
        debug!(player = %me, row = chosen.row, col = chosen.col, score, "Negamax move");
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(symbols: [[&str; 3]; 3]) -> Board {
        let rows = symbols
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect::<Vec<Vec<String>>>();
        Board::try_from(rows).unwrap()
    }

    #[test]
    fn test_takes_winning_move() {
        // O to move and can complete the middle column.
        let board = board_from([["X", "O", "X"], ["", "O", ""], ["X", "", ""]]);
        assert_eq!(Negamax::new().select_move(&board, Player::O).unwrap(), Move::new(2, 1));
    }

    #[test]
    fn test_blocks_opponent_line() {
        // X threatens the top row; O must block at (0, 2).
        let board = board_from([["X", "X", ""], ["", "O", ""], ["", "", ""]]);
        assert_eq!(Negamax::new().select_move(&board, Player::O).unwrap(), Move::new(0, 2));
    }

    #[test]
    fn test_prefers_center_on_empty_board() {
        assert_eq!(Negamax::new().select_move(&Board::new(), Player::X).unwrap(), Move::new(1, 1));
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let board = board_from([["X", "O", "X"], ["X", "O", "O"], ["O", "X", "X"]]);
        assert_eq!(Negamax::new().select_move(&board, Player::O), Err(MoveError::NoMovesAvailable));
    }

    #[test]
    fn test_plays_for_the_given_side() {
        // Equal mark counts; each side has its own winning cell.
        let board = board_from([["X", "", "X"], ["O", "O", ""], ["", "", ""]]);
        let mut selector = Negamax::new();
        assert_eq!(selector.select_move(&board, Player::O).unwrap(), Move::new(1, 2));
        assert_eq!(selector.select_move(&board, Player::X).unwrap(), Move::new(0, 1));
    }
}
