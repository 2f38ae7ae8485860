//! Connect-four on a 6-row, 7-column grid.
//!
//! Discs drop to the lowest empty row of the chosen column. Rows are indexed
//! from the top, matching the rendered board:
//! ```text
//! 0 1 2 3 4 5 6
//! - - - - - - -   <- row 0
//! ...
//! - - - - - - -   <- row 5 (bottom)
//! ```

use crate::games::tictactoe::side_from_counts;
use arena_core::{ArenaError, GameState, Mark, Outcome, Result, Side};
use std::fmt;

/// Board dimensions
pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Scan directions as (row delta, column delta): horizontal, vertical,
/// down-right diagonal, up-right diagonal.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// A connect-four move: the column and the row the disc lands in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ConnectFourMove {
    pub row: u8,
    pub col: u8,
}

impl fmt::Display for ConnectFourMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.col)
    }
}

/// Connect-four position.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct ConnectFourState {
    /// Row-major grid, row 0 at the top.
    cells: [Mark; ROWS * COLS],
    current: Side,
    outcome: Option<Outcome>,
}

impl ConnectFourState {
    /// Create an empty board with X to move.
    pub fn new() -> Self {
        Self {
            cells: [Mark::Empty; ROWS * COLS],
            current: Side::First,
            outcome: None,
        }
    }

    /// Build a position from six row strings, top row first.
    ///
    /// Discs are not required to rest on anything; only the mark counts are
    /// checked.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidPosition` for malformed rows or mark
    /// counts that alternating play cannot produce.
    pub fn from_rows(rows: [&str; ROWS]) -> Result<Self> {
        let mut cells = [Mark::Empty; ROWS * COLS];
        for (r, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != COLS {
                return Err(ArenaError::InvalidPosition(format!(
                    "row {} must have {} cells, got {:?}",
                    r, COLS, row
                )));
            }
            for (c, ch) in chars.into_iter().enumerate() {
                cells[r * COLS + c] = Mark::from_char(ch).ok_or_else(|| {
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
        if row < ROWS && col < COLS {
            self.cells[row * COLS + col]
        } else {
            Mark::Empty
        }
    }

    /// Row a disc dropped into `col` would land in, or `None` if the column
    /// is full or off the board.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row * COLS + col].is_empty())
    }

    /// Build the move for dropping a disc into `col`.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidMove` if the column is full or off the board.
    pub fn drop_in(&self, col: usize) -> Result<ConnectFourMove> {
        if col >= COLS {
            return Err(ArenaError::InvalidMove(format!(
                "column must be between 0 and {}, not {}",
                COLS - 1,
                col
            )));
        }
        self.landing_row(col)
            .map(|row| ConnectFourMove {
                row: row as u8,
                col: col as u8,
            })
            .ok_or_else(|| ArenaError::InvalidMove(format!("column {} is full", col)))
    }

    /// Four identical marks in a line starting at (row, col)?
    fn line_from(&self, row: usize, col: usize, (dr, dc): (isize, isize)) -> Option<Side> {
        let side = self.cells[row * COLS + col].side()?;
        for step in 1..4 {
            let r = row as isize + dr * step;
            let c = col as isize + dc * step;
            if r < 0 || r >= ROWS as isize || c < 0 || c >= COLS as isize {
                return None;
            }
            if self.cells[r as usize * COLS + c as usize].side() != Some(side) {
                return None;
            }
        }
        Some(side)
    }

    /// Scan every cell in every direction, then check for a full board.
    fn evaluate(&self) -> Option<Outcome> {
        for row in 0..ROWS {
            for col in 0..COLS {
                for dir in DIRECTIONS {
                    if let Some(side) = self.line_from(row, col, dir) {
                        return Some(Outcome::Win(side));
                    }
                }
            }
        }
        self.cells
            .iter()
            .all(|c| !c.is_empty())
            .then_some(Outcome::Draw)
    }
}

impl Default for ConnectFourState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectFourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for col in 0..COLS {
            if col > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", col)?;
        }
        writeln!(f)?;
        for row in 0..ROWS {
            for col in 0..COLS {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.cells[row * COLS + col])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl GameState for ConnectFourState {
    type Move = ConnectFourMove;

    fn side_to_move(&self) -> Side {
        self.current
    }

    fn legal_moves(&self) -> Vec<ConnectFourMove> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        (0..COLS)
            .filter_map(|col| {
                self.landing_row(col).map(|row| ConnectFourMove {
                    row: row as u8,
                    col: col as u8,
                })
            })
            .collect()
    }

    fn check_move(&self, mv: ConnectFourMove) -> Result<()> {
        if self.outcome.is_some() {
            return Err(ArenaError::InvalidMove(format!(
                "column {}: the game is over",
                mv.col
            )));
        }
        let expected = self.drop_in(mv.col as usize)?;
        if expected != mv {
            return Err(ArenaError::InvalidMove(format!(
                "a disc in column {} lands on row {}, not row {}",
                mv.col, expected.row, mv.row
            )));
        }
        Ok(())
    }

    fn apply(&mut self, mv: ConnectFourMove) -> Result<()> {
        self.check_move(mv)?;
        self.cells[mv.row as usize * COLS + mv.col as usize] = self.current.into();
        self.current = self.current.opposite();
        self.outcome = self.evaluate();
        Ok(())
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Accepts a column number.
    fn parse_move(&self, text: &str) -> Result<ConnectFourMove> {
        let col: usize = text
            .trim()
            .parse()
            .map_err(|_| ArenaError::InvalidMove(format!("{:?} is not a column", text.trim())))?;
        self.drop_in(col)
    }
}
