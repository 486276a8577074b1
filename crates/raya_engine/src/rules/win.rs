//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Player};
use tracing::instrument;

/// The eight winning lines as `(row, col)` triples, in check order.
pub const LINES: [[(usize, usize); 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` for the first line in [`LINES`] holding three of
/// that player's marks, `None` otherwise. Cells missing from a misshapen
/// board never complete a line.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Player> {
    for [a, b, c] in LINES {
        let sq = board.get(a.0, a.1);
        if let Some(Cell::Mark(player)) = sq
            && sq == board.get(b.0, b.1)
            && sq == board.get(c.0, c.1)
        {
            return Some(player);
        }
    }

    None
}

/// Whether the given player holds any complete line.
pub fn has_line(board: &Board, player: Player) -> bool {
    let mark = Some(Cell::Mark(player));
    LINES
        .iter()
        .any(|line| line.iter().all(|&(r, c)| board.get(r, c) == mark))
}
