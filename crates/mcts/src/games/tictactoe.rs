//! Tic-tac-toe on a 3x3 grid.
//!
//! Tic-tac-toe is a solved game where perfect play always results in a draw,
//! which makes it a good sanity check for the search: MCTS should never lose
//! against a random opponent.

use arena_core::{ArenaError, GameState, Mark, Outcome, Result, Side};
use std::fmt;

const SIZE: usize = 3;

/// The 8 winning lines as cell indices.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Tic-tac-toe move (cell index 0-8, row-major).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TicTacToeMove(pub u8);

impl TicTacToeMove {
    /// Build a move from coordinates, or `None` if off the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then(|| Self((row * SIZE + col) as u8))
    }

    /// Get the row (0-2).
    pub fn row(self) -> u8 {
        self.0 / SIZE as u8
    }

    /// Get the column (0-2).
    pub fn col(self) -> u8 {
        self.0 % SIZE as u8
    }
}

impl fmt::Display for TicTacToeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// Tic-tac-toe position.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToeState {
    /// Board: 9 cells, indexed 0-8 (row-major).
    /// ```text
    /// 0 | 1 | 2
    /// ---------
    /// 3 | 4 | 5
    /// ---------
    /// 6 | 7 | 8
    /// ```
    cells: [Mark; 9],

    /// Side to move.
    current: Side,

    /// Cached result, recomputed after every move.
    outcome: Option<Outcome>,
}

impl TicTacToeState {
    /// Create a new empty board with X to move.
    pub fn new() -> Self {
        Self {
            cells: [Mark::Empty; 9],
            current: Side::First,
            outcome: None,
        }
    }

    /// Build a position from three row strings such as `["XXX", "OO-", "---"]`.
    ///
    /// The side to move is derived from the mark counts.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidPosition` for malformed rows or when the
    /// mark counts could not arise from alternating play.
    pub fn from_rows(rows: [&str; 3]) -> Result<Self> {
        let mut cells = [Mark::Empty; 9];
        for (r, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != SIZE {
                return Err(ArenaError::InvalidPosition(format!(
                    "row {} must have {} cells, got {:?}",
                    r, SIZE, row
                )));
            }
            for (c, ch) in chars.into_iter().enumerate() {
                cells[r * SIZE + c] = Mark::from_char(ch).ok_or_else(|| {
                    ArenaError::InvalidPosition(format!("unknown cell {:?} in row {}", ch, r))
                })?;
            }
        }

        let current = side_from_counts(&cells)?;
        let mut state = Self {
            cells,
            current,
            outcome: None,
        };
        state.outcome = state.evaluate();
        Ok(state)
    }

    /// Get the mark at a cell.
    pub fn get(&self, row: usize, col: usize) -> Mark {
        if row < SIZE && col < SIZE {
            self.cells[row * SIZE + col]
        } else {
            Mark::Empty
        }
    }

    /// Scan all lines for three identical marks, then check for a full board.
    fn evaluate(&self) -> Option<Outcome> {
        for line in LINES {
            if let Some(side) = self.cells[line[0]].side() {
                if self.cells[line[1]] == self.cells[line[0]]
                    && self.cells[line[2]] == self.cells[line[0]]
                {
                    return Some(Outcome::Win(side));
                }
            }
        }
        self.is_full().then_some(Outcome::Draw)
    }

    /// Check if the board is full (draw if no winner).
    fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }
}

/// Derive the side to move from mark counts, as on any board filled by
/// alternating play starting with `First`.
pub(crate) fn side_from_counts(cells: &[Mark]) -> Result<Side> {
    let firsts = cells.iter().filter(|&&m| m == Mark::First).count();
    let seconds = cells.iter().filter(|&&m| m == Mark::Second).count();
    match firsts.checked_sub(seconds) {
        Some(0) => Ok(Side::First),
        Some(1) => Ok(Side::Second),
        _ => Err(ArenaError::InvalidPosition(format!(
            "{} X marks and {} O marks cannot arise from alternating play",
            firsts, seconds
        ))),
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for row in 0..SIZE {
            write!(f, "{}", row)?;
            for col in 0..SIZE {
                write!(f, " {}", self.cells[row * SIZE + col])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl GameState for TicTacToeState {
    type Move = TicTacToeMove;

    fn side_to_move(&self) -> Side {
        self.current
    }

    fn legal_moves(&self) -> Vec<TicTacToeMove> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| TicTacToeMove(i as u8))
            .collect()
    }

    fn check_move(&self, mv: TicTacToeMove) -> Result<()> {
        if self.outcome.is_some() {
            return Err(ArenaError::InvalidMove(format!("{}: the game is over", mv)));
        }
        match self.cells.get(mv.0 as usize) {
            None => Err(ArenaError::InvalidMove(format!(
                "cell {} is off the board, row and column must be between 0 and {}",
                mv.0,
                SIZE - 1
            ))),
            Some(cell) if !cell.is_empty() => Err(ArenaError::InvalidMove(format!(
                "{}: the cell is not empty",
                mv
            ))),
            Some(_) => Ok(()),
        }
    }

    fn apply(&mut self, mv: TicTacToeMove) -> Result<()> {
        self.check_move(mv)?;
        self.cells[mv.0 as usize] = self.current.into();
        self.current = self.current.opposite();
        self.outcome = self.evaluate();
        Ok(())
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Accepts `r c`, `r,c` or `(r, c)`.
    fn parse_move(&self, text: &str) -> Result<TicTacToeMove> {
        let coords: Vec<&str> = text
            .split(|c: char| c == ',' || c.is_whitespace() || c == '(' || c == ')')
            .filter(|s| !s.is_empty())
            .collect();
        let parsed: Option<Vec<usize>> = coords.iter().map(|s| s.parse().ok()).collect();
        match parsed.as_deref() {
            Some(&[row, col]) => TicTacToeMove::new(row, col).ok_or_else(|| {
                ArenaError::InvalidMove(format!(
                    "row and column values must be between 0 and {}, not ({}, {})",
                    SIZE - 1,
                    row,
                    col
                ))
            }),
            _ => Err(ArenaError::InvalidMove(format!(
                "{:?} is not a row and a column",
                text
            ))),
        }
    }
}
