//! Board state representation and win/draw detection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lines;

/// A cell on the tic-tac-toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// Character used in the canonical board key and the persisted files.
    ///
    /// Empty cells encode as `'_'`, matching the on-disk key alphabet.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opposing player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to the cell it places
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Where the game stands after the most recent move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Draw,
}

/// Canonical 9-character encoding of the board contents in index order.
///
/// This is the lookup key for the knowledge base and the string written to
/// the persisted files. Construction validates length and alphabet, so a
/// `BoardKey` always names a structurally well-formed board.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardKey(String);

impl BoardKey {
    /// Parse and validate a 9-character board key.
    ///
    /// Accepted marks are normalized to the canonical `_XO` alphabet, so
    /// a parsed key always compares equal to [`Board::encode`] output for
    /// the same position.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not exactly 9 characters or any
    /// character does not name a cell.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }
        let mut canonical = String::with_capacity(9);
        for (i, &c) in chars.iter().enumerate() {
            let cell = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
            canonical.push(cell.to_char());
        }
        Ok(BoardKey(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the key back into cell contents
    pub fn cells(&self) -> [Cell; 9] {
        let mut cells = [Cell::Empty; 9];
        for (i, c) in self.0.chars().enumerate() {
            // validated at construction
            cells[i] = Cell::from_char(c).unwrap_or(Cell::Empty);
        }
        cells
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BoardKey {
    type Error = crate::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        BoardKey::parse(&s)
    }
}

impl From<BoardKey> for String {
    fn from(key: BoardKey) -> String {
        key.0
    }
}

/// The 9-cell board and its game status.
///
/// The board does not track whose turn it is. The acting player is passed
/// explicitly into [`make_move`] and [`check_win`], so the engine cannot
/// drift out of sync with the session loop driving it.
///
/// [`make_move`]: Board::make_move
/// [`check_win`]: Board::check_win
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
    status: GameStatus,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; 9],
            status: GameStatus::InProgress,
        }
    }

    /// Reconstruct a board position from a canonical key.
    ///
    /// The resulting board is `InProgress`; callers that need win/draw
    /// status run the checks themselves.
    pub fn from_key(key: &BoardKey) -> Self {
        Board {
            cells: key.cells(),
            status: GameStatus::InProgress,
        }
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Get the winner if one has been recorded by [`check_win`]
    ///
    /// [`check_win`]: Board::check_win
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }

    /// Check whether a move is playable: in range and on an empty cell.
    /// No side effect.
    pub fn is_valid_move(&self, pos: usize) -> bool {
        pos < 9 && self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions in index order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `player`'s mark at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] if the game has already ended, or
    /// [`Error::InvalidMove`] if the position is occupied or out of range.
    /// The board is unchanged on error.
    ///
    /// [`Error::GameOver`]: crate::Error::GameOver
    /// [`Error::InvalidMove`]: crate::Error::InvalidMove
    pub fn make_move(&mut self, pos: usize, player: Player) -> Result<(), crate::Error> {
        if self.status != GameStatus::InProgress {
            return Err(crate::Error::GameOver);
        }
        if !self.is_valid_move(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }
        self.cells[pos] = player.to_cell();
        Ok(())
    }

    /// Check whether `player` has completed a winning line.
    ///
    /// On a win the board transitions to `Won(player)`. Only the mover's
    /// lines are scanned; the caller checks the player who just moved.
    pub fn check_win(&mut self, player: Player) -> bool {
        if lines::has_line(&self.cells, player) {
            self.status = GameStatus::Won(player);
            true
        } else {
            false
        }
    }

    /// Check for a draw: every cell filled and no winner recorded.
    ///
    /// Must be evaluated after [`check_win`] each turn, otherwise a full
    /// board whose final move completed a line would register as a draw.
    ///
    /// [`check_win`]: Board::check_win
    pub fn check_draw(&mut self) -> bool {
        if !self.cells.contains(&Cell::Empty) && self.winner().is_none() {
            self.status = GameStatus::Draw;
            true
        } else {
            false
        }
    }

    /// Return to the initial state: all cells empty, game in progress
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; 9];
        self.status = GameStatus::InProgress;
    }

    /// Canonical 9-character key for the current cell contents
    pub fn encode(&self) -> BoardKey {
        BoardKey(self.cells.iter().map(|&c| c.to_char()).collect())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1) % 3 == 0 && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
