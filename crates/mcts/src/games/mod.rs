//! Grid games implemented in-crate.
//!
//! Both are small enough to check search behavior against known results
//! before it is pointed at chess.

pub mod connect_four;
pub mod tictactoe;

pub use connect_four::{ConnectFourMove, ConnectFourState};
pub use tictactoe::{TicTacToeMove, TicTacToeState};
