//! Chess for the arena.
//!
//! Move generation and the board itself come from the `chess` crate.
//! `ChessState` adds what a full game needs on top of a single board:
//! clocks, repetition tracking, automatic draws, SAN and PGN movetext.

mod pgn;
mod san;
mod state;

pub use chess::{ChessMove, Color, Piece, Square};
pub use pgn::movetext;
pub use san::{format_san, parse_move};
pub use state::{ChessState, Termination, STARTING_FEN};
