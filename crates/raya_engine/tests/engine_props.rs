use proptest::prelude::*;
use raya_engine::{
    GameStatus, MoveError, Player, apply_move, create_game, evaluate, rules::win::has_line,
};

/// Cell choices, each in `0..9`; illegal picks are skipped while playing.
fn move_sequence() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..9, 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every accepted move adds exactly one mark, and players alternate
    /// while the game continues.
    #[test]
    fn legal_moves_are_monotonic_and_alternate(cells in move_sequence()) {
        let mut game = create_game();
        for idx in cells {
            let (row, col) = (idx / 3, idx % 3);
            let before = game.board().filled_count();
            let mover = game.current_player();
            match apply_move(&game, row, col) {
                Ok(next) => {
                    prop_assert_eq!(next.board().filled_count(), before + 1);
                    if next.status() == GameStatus::InProgress {
                        prop_assert_eq!(next.current_player(), mover.opponent());
                    } else {
                        prop_assert_eq!(next.current_player(), mover);
                    }
                    game = next;
                }
                Err(MoveError::CellOccupied { .. }) | Err(MoveError::GameFinished) => {}
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }

    /// Once finished, a game refuses every move and keeps its board.
    #[test]
    fn finished_games_are_immutable(cells in move_sequence(), row in 0usize..5, col in 0usize..5) {
        let mut game = create_game();
        for idx in cells {
            if let Ok(next) = apply_move(&game, idx / 3, idx % 3) {
                game = next;
            }
        }
        if game.status().is_terminal() {
            let board = game.board().clone();
            prop_assert_eq!(apply_move(&game, row, col), Err(MoveError::GameFinished));
            prop_assert_eq!(game.board(), &board);
        }
    }

    /// No board reached by legal play has a line for both players, and a
    /// recorded winner always holds a line.
    #[test]
    fn reachable_boards_have_one_winner_at_most(cells in move_sequence()) {
        let mut game = create_game();
        for idx in cells {
            if let Ok(next) = apply_move(&game, idx / 3, idx % 3) {
                game = next;
            }
            let board = game.board();
            prop_assert!(!(has_line(board, Player::X) && has_line(board, Player::O)));
            if let GameStatus::Won(winner) = game.status() {
                prop_assert!(has_line(board, winner));
                prop_assert!(!has_line(board, winner.opponent()));
            }
        }
    }

    /// Evaluating the same board twice gives the same answer.
    #[test]
    fn evaluate_is_stable(cells in move_sequence()) {
        let mut game = create_game();
        for idx in cells {
            if let Ok(next) = apply_move(&game, idx / 3, idx % 3) {
                game = next;
            }
        }
        prop_assert_eq!(evaluate(game.board()), evaluate(game.board()));
        prop_assert_eq!(evaluate(game.board()), game.status());
    }
}
