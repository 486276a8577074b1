//! Board shape and content checks.
//!
//! A board that fails these checks came from a damaged record; the engine
//! refuses to mutate it rather than carry the damage forward.

use super::{BOARD_SIZE, Board, Cell};
use tracing::{instrument, warn};

/// Checks that the board is exactly 3x3.
///
/// Cell content of a [`Board`] is already restricted to `Empty`, `X` or `O`
/// by its type, so only the shape can be wrong here.
#[instrument(skip(board))]
pub fn is_valid_board(board: &Board) -> bool {
    let rows = board.rows();
    let valid = rows.len() == BOARD_SIZE && rows.iter().all(|row| row.len() == BOARD_SIZE);
    if !valid {
        warn!(
            rows = rows.len(),
            widths = ?rows.iter().map(Vec::len).collect::<Vec<_>>(),
            "Board has invalid dimensions"
        );
    }
    valid
}

/// Checks a board in its serialized form: 3x3 and every symbol one of
/// `""`, `"X"` or `"O"`.
#[instrument(skip(rows))]
pub fn is_valid_raw_board<S: AsRef<str>>(rows: &[Vec<S>]) -> bool {
    let shape_ok = rows.len() == BOARD_SIZE && rows.iter().all(|row| row.len() == BOARD_SIZE);
    if !shape_ok {
        warn!(rows = rows.len(), "Serialized board has invalid dimensions");
        return false;
    }

    let symbols_ok = rows
        .iter()
        .flatten()
        .all(|s| Cell::from_symbol(s.as_ref()).is_some());
    if !symbols_ok {
        warn!("Serialized board holds an unknown symbol");
    }
    symbols_ok
}
