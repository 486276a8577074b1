//! Move application: the only path that changes a game.

use super::opponent::MoveSelector;
use super::rules::evaluate;
use super::validate::is_valid_board;
use super::{BOARD_SIZE, Cell, Game, GameStatus, MoveError, Player};
use tracing::{debug, info, instrument, warn};

/// Creates a new game: empty board, X to move, in progress.
#[instrument]
pub fn create_game() -> Game {
    let game = Game::new();
    info!(game_id = %game.id(), "Game created");
    game
}

/// Places the current player's mark at `(row, col)`.
///
/// Preconditions are checked in order, and the first failure is reported:
///
/// 1. the game is in progress, else [`MoveError::GameFinished`];
/// 2. row and column are within `0..=2`, else [`MoveError::OutOfBounds`];
/// 3. the cell is empty, else [`MoveError::CellOccupied`];
/// 4. the board is a valid 3x3 board, else [`MoveError::CorruptedState`].
///
/// On success the returned game has the mark placed and its status
/// re-evaluated. The turn passes to the other player only if the game is
/// still in progress. The input game is never modified.
#[instrument(skip(game), fields(game_id = %game.id(), player = %game.current_player()))]
pub fn apply_move(game: &Game, row: usize, col: usize) -> Result<Game, MoveError> {
    if game.status().is_terminal() {
        warn!(status = %game.status(), "Move on finished game");
        return Err(MoveError::GameFinished);
    }

    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        warn!(row, col, "Move out of bounds");
        return Err(MoveError::OutOfBounds { row, col });
    }

    // A cell missing from a misshapen board is not "occupied"; the shape
    // check below reports it.
    if let Some(Cell::Mark(owner)) = game.board().get(row, col) {
        warn!(row, col, owner = %owner, "Cell already occupied");
        return Err(MoveError::CellOccupied { row, col });
    }

    if !is_valid_board(game.board()) {
        warn!("Refusing to move on corrupted board");
        return Err(MoveError::CorruptedState);
    }

    let player = game.current_player();
    let mut next = game.clone();
    next.board_mut().set(row, col, Cell::Mark(player));

    let status = evaluate(next.board());
    if let Some(winner) = status.winner() {
        info!(winner = %winner, "Game won");
    }
    if status.is_terminal() {
        next.set_status(status);
    } else {
        next.set_current_player(player.opponent());
    }
    next.touch();

    info!(row, col, status = %next.status(), next_player = %next.current_player(), "Move applied");
    Ok(next)
}

/// Plays one move for the automated side.
///
/// Fails with [`MoveError::GameFinished`] if the game is over,
/// [`MoveError::NotAutomatedTurn`] if `automated` is not to move, and
/// [`MoveError::CorruptedState`] if the board is damaged. Otherwise the
/// selector's choice goes through [`apply_move`].
#[instrument(skip(game, selector), fields(game_id = %game.id()))]
pub fn apply_automated_move<S>(
    game: &Game,
    automated: Player,
    selector: &mut S,
) -> Result<Game, MoveError>
where
    S: MoveSelector + ?Sized,
{
    if game.status() != GameStatus::InProgress {
        return Err(MoveError::GameFinished);
    }

    if game.current_player() != automated {
        warn!(automated = %automated, to_move = %game.current_player(), "Not the automated turn");
        return Err(MoveError::NotAutomatedTurn(game.current_player()));
    }

    if !is_valid_board(game.board()) {
        return Err(MoveError::CorruptedState);
    }

    let choice = selector.select_move(game.board(), automated)?;
    debug!(row = choice.row, col = choice.col, "Automated move selected");
    apply_move(game, choice.row, choice.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, CenterThenRandom, Move};

    fn play(game: &Game, moves: &[(usize, usize)]) -> Game {
        moves.iter().fold(game.clone(), |g, &(r, c)| {
            apply_move(&g, r, c).unwrap()
        })
    }

    #[test]
    fn test_first_move_marks_x_and_passes_turn() {
        let game = create_game();
        let next = apply_move(&game, 0, 0).unwrap();
        assert_eq!(next.board().get(0, 0), Some(Cell::Mark(Player::X)));
        assert_eq!(next.current_player(), Player::O);
        assert_eq!(next.status(), GameStatus::InProgress);
        assert!(next.updated_at() >= game.updated_at());
        assert_eq!(next.created_at(), game.created_at());
        assert_eq!(next.id(), game.id());
    }

    #[test]
    fn test_input_game_untouched() {
        let game = create_game();
        let _ = apply_move(&game, 1, 1).unwrap();
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.current_player(), Player::X);
    }

    #[test]
    fn test_winning_move_keeps_current_player() {
        // X: (0,0) (0,1) (0,2); O: (1,0) (1,1)
        let game = play(&create_game(), &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let done = apply_move(&game, 0, 2).unwrap();
        assert_eq!(done.status(), GameStatus::Won(Player::X));
        assert_eq!(done.current_player(), Player::X);
    }

    #[test]
    fn test_finished_checked_before_bounds() {
        let game = play(&create_game(), &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(apply_move(&game, 5, 5), Err(MoveError::GameFinished));
    }

    #[test]
    fn test_bounds_checked_before_occupancy() {
        let game = play(&create_game(), &[(0, 0)]);
        assert_eq!(
            apply_move(&game, 0, 3),
            Err(MoveError::OutOfBounds { row: 0, col: 3 })
        );
    }

    #[test]
    fn test_occupancy_checked_before_corruption() {
        let x = Cell::Mark(Player::X);
        let e = Cell::Empty;
        let board = Board::from_rows(vec![vec![x, e, e], vec![e, e]]);
        let game = Game::from_parts(
            crate::GameId::new(),
            board,
            Player::O,
            GameStatus::InProgress,
            chrono::Utc::now(),
            chrono::Utc::now(),
        );
        assert_eq!(
            apply_move(&game, 0, 0),
            Err(MoveError::CellOccupied { row: 0, col: 0 })
        );
        assert_eq!(apply_move(&game, 0, 1), Err(MoveError::CorruptedState));
        // Missing cell of a short row
        assert_eq!(apply_move(&game, 1, 2), Err(MoveError::CorruptedState));
    }

    #[test]
    fn test_automated_move_rejects_wrong_turn() {
        let game = create_game();
        let mut selector = CenterThenRandom::with_seed(3);
        assert_eq!(
            apply_automated_move(&game, Player::O, &mut selector),
            Err(MoveError::NotAutomatedTurn(Player::X))
        );
    }

    #[test]
    fn test_automated_move_on_finished_game() {
        let game = play(&create_game(), &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let mut selector = CenterThenRandom::with_seed(3);
        assert_eq!(
            apply_automated_move(&game, Player::X, &mut selector),
            Err(MoveError::GameFinished)
        );
    }

    struct Fixed(Move);

    impl MoveSelector for Fixed {
        fn select_move(&mut self, _board: &Board, _player: Player) -> Result<Move, MoveError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_automated_move_reuses_move_checks() {
        let game = play(&create_game(), &[(0, 0)]);
        let mut selector = Fixed(Move::new(0, 0));
        assert_eq!(
            apply_automated_move(&game, Player::O, &mut selector),
            Err(MoveError::CellOccupied { row: 0, col: 0 })
        );
    }
}
