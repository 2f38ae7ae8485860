use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::{ArenaError, Outcome, Result, Side};

/// A two-player, alternating-turn game position.
///
/// The search engine only talks to games through this trait, so the same
/// code drives tic-tac-toe, connect-four and chess. Implementations have
/// value semantics: a clone shares no mutable storage with the original, and
/// speculative search never touches the live game.
pub trait GameState: Clone + Display {
    /// A move in this game (e.g. a board cell or a chess move)
    type Move: Copy + Eq + Hash + Debug + Display;

    /// The side that acts next
    fn side_to_move(&self) -> Side;

    /// All legal moves in this position. Empty once the game is over.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Validates a move without committing it.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidMove` naming the rejected move.
    fn check_move(&self, mv: Self::Move) -> Result<()>;

    /// Plays a move and hands the turn to the other side.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidMove` if the move is not legal. The
    /// position is left untouched in that case.
    fn apply(&mut self, mv: Self::Move) -> Result<()>;

    /// The result of the game, or `None` while it is still running.
    ///
    /// Repeated calls on the same position always agree.
    fn outcome(&self) -> Option<Outcome>;

    /// Parses a move typed by a human in this game's notation.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidMove` if the text does not describe a
    /// move in this position.
    fn parse_move(&self, text: &str) -> Result<Self::Move>;

    /// Returns true if the game has ended (win or draw)
    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// The winning side, if the game ended decisively
    fn winner(&self) -> Option<Side> {
        self.outcome().and_then(Outcome::winner)
    }

    /// The final result.
    ///
    /// # Errors
    /// Returns `ArenaError::GameNotFinished` if the game is still running.
    fn result(&self) -> Result<Outcome> {
        self.outcome().ok_or(ArenaError::GameNotFinished)
    }

    /// Clones the position and plays `mv` on the copy
    fn after(&self, mv: Self::Move) -> Result<Self> {
        let mut next = self.clone();
        next.apply(mv)?;
        Ok(next)
    }

    /// Human-readable board dump
    fn render(&self) -> String {
        self.to_string()
    }
}
