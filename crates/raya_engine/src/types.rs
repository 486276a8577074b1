//! Core domain types for the game engine.

use crate::action::MoveError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 3;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// The mark this player writes into a cell.
    pub fn symbol(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell marked by a player.
    Mark(Player),
}

impl Cell {
    /// Symbol used for this cell in the serialized board.
    pub fn symbol(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Mark(player) => player.symbol(),
        }
    }

    /// Parses a serialized cell symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "" => Some(Cell::Empty),
            "X" => Some(Cell::Mark(Player::X)),
            "O" => Some(Cell::Mark(Player::O)),
            _ => None,
        }
    }

    /// Checks if the cell is empty.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// The game board as a list of rows.
///
/// A freshly created board is always 3x3. Boards rebuilt from persisted
/// records keep whatever shape they were stored with, so that a damaged
/// record can be detected by [`crate::is_valid_board`] instead of being
/// silently repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<String>>", try_from = "Vec<Vec<String>>")]
pub struct Board {
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates a new empty 3x3 board.
    pub fn new() -> Self {
        Self {
            rows: vec![vec![Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Builds a board from rows as-is, without checking the shape.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Gets the cell at the given coordinates, if it exists.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Checks if the cell at the given coordinates exists and is empty.
    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Writes a cell. Out-of-shape coordinates are ignored.
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Coordinates of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_empty())
                    .map(move |(c, _)| (r, c))
            })
            .collect()
    }

    /// Number of marked cells.
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => " ",
                        Cell::Mark(p) => p.symbol(),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n-+-+-\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for Vec<Vec<String>> {
    fn from(board: Board) -> Self {
        board
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.symbol().to_string()).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<String>>> for Board {
    type Error = MoveError;

    /// Decodes the serialized form, rejecting unknown symbols.
    ///
    /// The shape is preserved as stored.
    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|s| Cell::from_symbol(s).ok_or(MoveError::CorruptedState))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Current status of the game.
///
/// Serialized as one of `IN_PROGRESS`, `X_WON`, `O_WON` or `DRAW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Every status in wire form.
    pub const WIRE_VALUES: [&'static str; 4] = ["IN_PROGRESS", "X_WON", "O_WON", "DRAW"];

    /// Wire representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::Won(Player::X) => "X_WON",
            GameStatus::Won(Player::O) => "O_WON",
            GameStatus::Draw => "DRAW",
        }
    }

    /// Whether no further moves are legal.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    /// The winner, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid status value: '{}'", value)]
pub struct StatusParseError {
    /// The rejected input.
    pub value: String,
}

impl std::str::FromStr for GameStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(GameStatus::InProgress),
            "X_WON" => Ok(GameStatus::Won(Player::X)),
            "O_WON" => Ok(GameStatus::Won(Player::O)),
            "DRAW" => Ok(GameStatus::Draw),
            other => Err(StatusParseError {
                value: other.to_string(),
            }),
        }
    }
}

impl From<GameStatus> for String {
    fn from(status: GameStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for GameStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Unique identifier for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Create a new random game ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A game record.
///
/// Records are created by [`crate::create_game`] and changed only by
/// [`crate::apply_move`]; collaborators rebuild stored records with
/// [`Game::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    id: GameId,
    board: Board,
    current_player: Player,
    status: GameStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Game {
    /// Creates a new game: empty board, X to move.
    pub(crate) fn new() -> Self {
        let now = Utc::now();
        Self {
            id: GameId::new(),
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::InProgress,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a game from stored fields.
    pub fn from_parts(
        id: GameId,
        board: Board,
        current_player: Player,
        status: GameStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            board,
            current_player,
            status,
            created_at,
            updated_at,
        }
    }

    /// Returns the game identifier.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn is next.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub(crate) fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
