//! `ChessState`: a `chess::Board` plus the game history the board alone
//! does not keep (clocks, repetitions, the moves played).

use std::{fmt, str::FromStr};

use arena_core::{ArenaError, GameState, Outcome, Result, Side};
use chess::{Board, BoardStatus, ChessMove, Color, File, MoveGen, Piece, Rank, Square};

use crate::{pgn, san};

/// Positions repeated this many times end the game.
const REPETITION_LIMIT: usize = 5;

/// Half-moves without a capture or pawn move that end the game.
const HALFMOVE_LIMIT: u32 = 150;

/// Standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Why a game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::Checkmate => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::InsufficientMaterial => "insufficient material",
            Termination::SeventyFiveMoves => "seventy-five-move rule",
            Termination::FivefoldRepetition => "fivefold repetition",
        };
        f.write_str(text)
    }
}

/// A chess game in progress.
#[derive(Clone, PartialEq, Eq)]
pub struct ChessState {
    board: Board,
    /// Position the game started from, with its clocks.
    start: Board,
    start_halfmove: u32,
    start_fullmove: u32,
    moves: Vec<ChessMove>,
    halfmove_clock: u32,
    fullmove_number: u32,
    /// Hash of every position reached, the current one last.
    hashes: Vec<u64>,
}

impl ChessState {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::default(), 0, 1)
    }

    /// Set up a position from FEN. Missing clock fields default to `0 1`.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidPosition` if the FEN is rejected.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = Board::from_str(fen.trim())
            .map_err(|e| ArenaError::InvalidPosition(format!("{}: {:?}", fen, e)))?;

        let fields: Vec<&str> = fen.split_whitespace().collect();
        let clock = |idx: usize, default: u32| -> Result<u32> {
            fields.get(idx).map_or(Ok(default), |s| {
                s.parse().map_err(|_| {
                    ArenaError::InvalidPosition(format!("bad clock field {:?} in {}", s, fen))
                })
            })
        };
        let halfmove = clock(4, 0)?;
        let fullmove = clock(5, 1)?.max(1);

        Ok(Self::from_board(board, halfmove, fullmove))
    }

    fn from_board(board: Board, halfmove: u32, fullmove: u32) -> Self {
        Self {
            board,
            start: board,
            start_halfmove: halfmove,
            start_fullmove: fullmove,
            moves: Vec::new(),
            halfmove_clock: halfmove,
            fullmove_number: fullmove,
            hashes: vec![board.get_hash()],
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves played since the starting position.
    pub fn moves(&self) -> &[ChessMove] {
        &self.moves
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// True if the game started from the standard position.
    pub fn is_standard_start(&self) -> bool {
        self.start == Board::default() && self.start_halfmove == 0 && self.start_fullmove == 1
    }

    /// FEN of the current position.
    pub fn fen(&self) -> String {
        fen_with_clocks(&self.board, self.halfmove_clock, self.fullmove_number)
    }

    /// FEN of the position the game started from.
    pub fn start_fen(&self) -> String {
        fen_with_clocks(&self.start, self.start_halfmove, self.start_fullmove)
    }

    /// Argument for a UCI `position` command: `fen <start> moves <m1> <m2> ...`.
    pub fn uci_position(&self) -> String {
        let mut cmd = format!("fen {}", self.start_fen());
        if !self.moves.is_empty() {
            cmd.push_str(" moves");
            for mv in &self.moves {
                cmd.push(' ');
                cmd.push_str(&mv.to_string());
            }
        }
        cmd
    }

    /// True if the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    /// SAN of a legal move in the current position.
    pub fn san(&self, mv: ChessMove) -> String {
        san::format_san(&self.board, mv)
    }

    /// SAN of every move played, replayed from the start.
    pub fn san_history(&self) -> Vec<String> {
        let mut board = self.start;
        self.moves
            .iter()
            .map(|&mv| {
                let text = san::format_san(&board, mv);
                board = board.make_move_new(mv);
                text
            })
            .collect()
    }

    /// PGN movetext of the game so far, `comments[i]` following move `i`.
    pub fn movetext(&self, comments: &[String], result: &str) -> String {
        let white_first = self.start.side_to_move() == Color::White;
        pgn::movetext(
            &self.san_history(),
            comments,
            self.start_fullmove,
            white_first,
            result,
        )
    }

    /// How the game ended, if it has.
    pub fn termination(&self) -> Option<Termination> {
        match self.board.status() {
            BoardStatus::Checkmate => Some(Termination::Checkmate),
            BoardStatus::Stalemate => Some(Termination::Stalemate),
            BoardStatus::Ongoing => {
                if self.insufficient_material() {
                    Some(Termination::InsufficientMaterial)
                } else if self.halfmove_clock >= HALFMOVE_LIMIT {
                    Some(Termination::SeventyFiveMoves)
                } else if self.repetitions() >= REPETITION_LIMIT {
                    Some(Termination::FivefoldRepetition)
                } else {
                    None
                }
            }
        }
    }

    /// How many times the current position has occurred.
    pub fn repetitions(&self) -> usize {
        let current = self.board.get_hash();
        self.hashes.iter().filter(|&&h| h == current).count()
    }

    /// Neither side can ever deliver mate: bare kings, a lone knight, or
    /// any number of bishops that all stand on squares of one colour.
    fn insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy =
            *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if heavy.popcnt() > 0 {
            return false;
        }

        let knights = *board.pieces(Piece::Knight);
        let bishops = *board.pieces(Piece::Bishop);

        // K+N vs K
        if knights.popcnt() > 0 {
            return (knights | bishops).popcnt() == 1;
        }

        let mut shades = bishops.map(square_shade);
        match shades.next() {
            None => true,
            Some(first) => shades.all(|shade| shade == first),
        }
    }
}

impl Default for ChessState {
    fn default() -> Self {
        Self::new()
    }
}

fn square_shade(sq: Square) -> usize {
    (sq.get_file().to_index() + sq.get_rank().to_index()) % 2
}

fn fen_with_clocks(board: &Board, halfmove: u32, fullmove: u32) -> String {
    // The board's own FEN has placeholder clocks
    let text = board.to_string();
    let fields: Vec<&str> = text.split_whitespace().take(4).collect();
    format!("{} {} {}", fields.join(" "), halfmove, fullmove)
}

fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::First,
        Color::Black => Side::Second,
    }
}

pub(crate) fn piece_char(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

impl fmt::Display for ChessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let cells: Vec<String> = (0..8)
                .map(|file| {
                    let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
                    match (self.board.piece_on(sq), self.board.color_on(sq)) {
                        (Some(piece), Some(color)) => piece_char(piece, color).to_string(),
                        _ => ".".to_string(),
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChessState")
            .field("fen", &self.fen())
            .field("moves", &self.moves.len())
            .field("repetitions", &self.repetitions())
            .finish()
    }
}

impl GameState for ChessState {
    type Move = ChessMove;

    fn side_to_move(&self) -> Side {
        side_of(self.board.side_to_move())
    }

    fn legal_moves(&self) -> Vec<ChessMove> {
        if self.termination().is_some() {
            return Vec::new();
        }
        MoveGen::new_legal(&self.board).collect()
    }

    fn check_move(&self, mv: ChessMove) -> Result<()> {
        if let Some(reason) = self.termination() {
            return Err(ArenaError::InvalidMove(format!(
                "{}: the game is over ({})",
                mv, reason
            )));
        }
        if !self.board.legal(mv) {
            return Err(ArenaError::InvalidMove(format!(
                "{} is not legal in {}",
                mv,
                self.fen()
            )));
        }
        Ok(())
    }

    fn apply(&mut self, mv: ChessMove) -> Result<()> {
        self.check_move(mv)?;

        let resets_clock = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        if self.board.side_to_move() == Color::Black {
            self.fullmove_number += 1;
        }

        self.board = self.board.make_move_new(mv);
        self.moves.push(mv);
        self.hashes.push(self.board.get_hash());
        Ok(())
    }

    fn outcome(&self) -> Option<Outcome> {
        self.termination().map(|reason| match reason {
            // The side to move has been mated
            Termination::Checkmate => Outcome::Win(self.side_to_move().opposite()),
            _ => Outcome::Draw,
        })
    }

    /// Accepts SAN (`Nf3`, `O-O`, `exd8=Q+`) or UCI (`g1f3`, `e7e8q`).
    fn parse_move(&self, text: &str) -> Result<ChessMove> {
        san::parse_move(&self.board, text)
    }
}
