//! Raya engine - pure tic-tac-toe game logic
//!
//! The engine owns every rule of the game and nothing else: it performs no
//! I/O and keeps no state between calls. A collaborator loads or creates a
//! [`Game`], hands it to [`apply_move`] or [`apply_automated_move`], and
//! persists the returned record.
//!
//! # Example
//!
//! ```
//! use raya_engine::{apply_automated_move, apply_move, create_game, CenterThenRandom, GameStatus, Player};
//!
//! let game = create_game();
//! let game = apply_move(&game, 0, 0)?;
//! assert_eq!(game.current_player(), Player::O);
//!
//! let mut opponent = CenterThenRandom::with_seed(1);
//! let game = apply_automated_move(&game, Player::O, &mut opponent)?;
//! assert_eq!(game.status(), GameStatus::InProgress);
//! # Ok::<(), raya_engine::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod opponent;
pub mod rules;
mod types;
mod validate;

pub use action::{Move, MoveError};
pub use game::{apply_automated_move, apply_move, create_game};
pub use opponent::{CenterThenRandom, MoveSelector, Negamax, Opponent};
pub use rules::evaluate;
pub use types::{BOARD_SIZE, Board, Cell, Game, GameId, GameStatus, Player, StatusParseError};
pub use validate::{is_valid_board, is_valid_raw_board};
