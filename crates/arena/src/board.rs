//! The three playable games behind one `GameState`.

use std::{fmt, str::FromStr};

use arena_chess::{ChessMove, ChessState};
use arena_core::{ArenaError, GameState, Outcome, Result, Side};
use arena_mcts::games::{ConnectFourMove, ConnectFourState, TicTacToeMove, TicTacToeState};
use serde::Serialize;

/// Which game to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    TicTacToe,
    ConnectFour,
    Chess,
}

impl GameKind {
    /// Canonical name, as written in game records.
    pub fn name(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tic_tac_toe",
            GameKind::ConnectFour => "connect4",
            GameKind::Chess => "chess",
        }
    }

    /// A board in the starting position.
    pub fn new_board(self) -> Board {
        match self {
            GameKind::TicTacToe => Board::TicTacToe(TicTacToeState::new()),
            GameKind::ConnectFour => Board::ConnectFour(ConnectFourState::new()),
            GameKind::Chess => Board::Chess(ChessState::new()),
        }
    }

    /// How each side is called when announcing turns.
    pub fn side_name(self, side: Side) -> &'static str {
        match (self, side) {
            (GameKind::Chess, Side::First) => "White",
            (GameKind::Chess, Side::Second) => "Black",
            (_, Side::First) => "X",
            (_, Side::Second) => "O",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "chess" => Ok(GameKind::Chess),
            "tic_tac_toe" | "tic tac toe" | "tictactoe" => Ok(GameKind::TicTacToe),
            "connect4" | "connect_four" => Ok(GameKind::ConnectFour),
            other => Err(ArenaError::UnsupportedGame(other.to_string())),
        }
    }
}

/// A move in any of the games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnyMove {
    TicTacToe(TicTacToeMove),
    ConnectFour(ConnectFourMove),
    Chess(ChessMove),
}

impl fmt::Display for AnyMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyMove::TicTacToe(mv) => mv.fmt(f),
            AnyMove::ConnectFour(mv) => mv.fmt(f),
            AnyMove::Chess(mv) => mv.fmt(f),
        }
    }
}

/// A position in any of the games.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Board {
    TicTacToe(TicTacToeState),
    ConnectFour(ConnectFourState),
    Chess(ChessState),
}

impl Board {
    pub fn kind(&self) -> GameKind {
        match self {
            Board::TicTacToe(_) => GameKind::TicTacToe,
            Board::ConnectFour(_) => GameKind::ConnectFour,
            Board::Chess(_) => GameKind::Chess,
        }
    }

    /// Questions a human answers to enter one move; the answers are joined
    /// with spaces and handed to `parse_move`.
    pub fn prompts(&self) -> &'static [&'static str] {
        match self {
            Board::TicTacToe(_) => &["row", "column"],
            Board::ConnectFour(_) => &["column"],
            Board::Chess(_) => &["move"],
        }
    }
}

fn wrong_variant(kind: GameKind, mv: AnyMove) -> ArenaError {
    ArenaError::InvalidMove(format!("{} is not a {} move", mv, kind))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Board::TicTacToe(state) => state.fmt(f),
            Board::ConnectFour(state) => state.fmt(f),
            Board::Chess(state) => state.fmt(f),
        }
    }
}

impl GameState for Board {
    type Move = AnyMove;

    fn side_to_move(&self) -> Side {
        match self {
            Board::TicTacToe(state) => state.side_to_move(),
            Board::ConnectFour(state) => state.side_to_move(),
            Board::Chess(state) => state.side_to_move(),
        }
    }

    fn legal_moves(&self) -> Vec<AnyMove> {
        match self {
            Board::TicTacToe(state) => state
                .legal_moves()
                .into_iter()
                .map(AnyMove::TicTacToe)
                .collect(),
            Board::ConnectFour(state) => state
                .legal_moves()
                .into_iter()
                .map(AnyMove::ConnectFour)
                .collect(),
            Board::Chess(state) => state.legal_moves().into_iter().map(AnyMove::Chess).collect(),
        }
    }

    fn check_move(&self, mv: AnyMove) -> Result<()> {
        match (self, mv) {
            (Board::TicTacToe(state), AnyMove::TicTacToe(m)) => state.check_move(m),
            (Board::ConnectFour(state), AnyMove::ConnectFour(m)) => state.check_move(m),
            (Board::Chess(state), AnyMove::Chess(m)) => state.check_move(m),
            _ => Err(wrong_variant(self.kind(), mv)),
        }
    }

    fn apply(&mut self, mv: AnyMove) -> Result<()> {
        let kind = self.kind();
        match (self, mv) {
            (Board::TicTacToe(state), AnyMove::TicTacToe(m)) => state.apply(m),
            (Board::ConnectFour(state), AnyMove::ConnectFour(m)) => state.apply(m),
            (Board::Chess(state), AnyMove::Chess(m)) => state.apply(m),
            _ => Err(wrong_variant(kind, mv)),
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        match self {
            Board::TicTacToe(state) => state.outcome(),
            Board::ConnectFour(state) => state.outcome(),
            Board::Chess(state) => state.outcome(),
        }
    }

    fn parse_move(&self, text: &str) -> Result<AnyMove> {
        match self {
            Board::TicTacToe(state) => state.parse_move(text).map(AnyMove::TicTacToe),
            Board::ConnectFour(state) => state.parse_move(text).map(AnyMove::ConnectFour),
            Board::Chess(state) => state.parse_move(text).map(AnyMove::Chess),
        }
    }
}
