//! Shared domain types with enforced invariants.
//!
//! - Side: the first or second mover
//! - Mark: content of a grid cell
//! - Outcome: how a finished game ended
//! - Reward: game value in range [-1, 1]

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two players, identified by move order.
///
/// `First` is X in tic-tac-toe and connect-four and White in chess.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Get the opposing side.
    pub fn opposite(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Grid symbol used for this side's marks.
    pub fn symbol(self) -> char {
        match self {
            Side::First => 'X',
            Side::Second => 'O',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Content of a single grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Mark {
    #[default]
    Empty,
    First,
    Second,
}

impl Mark {
    /// The side owning this mark, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Mark::Empty => None,
            Mark::First => Some(Side::First),
            Mark::Second => Some(Side::Second),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Mark::Empty
    }

    /// Character used when rendering a grid.
    pub fn to_char(self) -> char {
        match self {
            Mark::Empty => '-',
            Mark::First => 'X',
            Mark::Second => 'O',
        }
    }

    /// Parse a grid character. Accepts `-`, `.` or space for an empty cell.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '-' | '.' | ' ' => Some(Mark::Empty),
            'X' | 'x' => Some(Mark::First),
            'O' | 'o' => Some(Mark::Second),
            _ => None,
        }
    }
}

impl From<Side> for Mark {
    fn from(side: Side) -> Self {
        match side {
            Side::First => Mark::First,
            Side::Second => Mark::Second,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// How a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Outcome {
    Win(Side),
    Draw,
}

impl Outcome {
    /// The winning side, or `None` for a draw.
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Win(side) => Some(side),
            Outcome::Draw => None,
        }
    }

    /// Reward of this outcome seen from `side`: +1 win, 0 draw, -1 loss.
    pub fn reward_for(self, side: Side) -> Reward {
        match self {
            Outcome::Win(winner) if winner == side => Reward::WIN,
            Outcome::Win(_) => Reward::LOSS,
            Outcome::Draw => Reward::DRAW,
        }
    }

    /// Result token as written in game records: `1-0`, `0-1` or `1/2-1/2`.
    pub fn result_string(self) -> &'static str {
        match self {
            Outcome::Win(Side::First) => "1-0",
            Outcome::Win(Side::Second) => "0-1",
            Outcome::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.result_string())
    }
}

/// A game reward.
///
/// Invariant: the value is in range [-1, 1] where:
/// - +1 means the side in question won
/// - -1 means it lost
/// - 0 means a draw
///
/// # Example
/// ```
/// use arena_core::Reward;
///
/// let reward = Reward::clamped(0.5);
/// assert_eq!(reward.negate().get(), -0.5);
/// assert_eq!(Reward::clamped(1.5), Reward::WIN);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Reward(f32);

impl Reward {
    /// Reward for a win.
    pub const WIN: Self = Self(1.0);

    /// Reward for a loss.
    pub const LOSS: Self = Self(-1.0);

    /// Reward for a draw.
    pub const DRAW: Self = Self(0.0);

    /// Create a reward by clamping to [-1, 1].
    ///
    /// Averages of many rewards can drift slightly outside the range.
    pub fn clamped(value: f32) -> Self {
        Self(value.clamp(-1.0, 1.0))
    }

    /// Get the underlying value.
    pub fn get(self) -> f32 {
        self.0
    }

    /// The same reward from the opponent's perspective.
    pub fn negate(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<Reward> for f32 {
    fn from(r: Reward) -> f32 {
        r.0
    }
}
