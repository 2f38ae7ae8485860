//! Standard algebraic notation.
//!
//! Formatting follows the PGN export rules: piece letter, the least
//! disambiguation that makes the move unique, `x` for captures, `=Q` for
//! promotions and a `+`/`#` suffix. Parsing matches the input against the
//! SAN and UCI spelling of every legal move, so anything this module can
//! print it can also read back.

use arena_core::{ArenaError, Result};
use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece, Square};

use crate::state::piece_char;

fn file_char(sq: Square) -> char {
    (b'a' + sq.get_file().to_index() as u8) as char
}

fn rank_char(sq: Square) -> char {
    (b'1' + sq.get_rank().to_index() as u8) as char
}

/// SAN of `mv`, which must be legal on `board`.
pub fn format_san(board: &Board, mv: ChessMove) -> String {
    let (src, dst) = (mv.get_source(), mv.get_dest());
    let piece = match board.piece_on(src) {
        Some(piece) => piece,
        None => return mv.to_string(),
    };

    let mut text = String::new();
    let file_delta = dst.get_file().to_index() as i32 - src.get_file().to_index() as i32;

    if piece == Piece::King && file_delta.abs() == 2 {
        text.push_str(if file_delta > 0 { "O-O" } else { "O-O-O" });
    } else if piece == Piece::Pawn {
        // Diagonal pawn moves are captures, en passant included
        if file_delta != 0 {
            text.push(file_char(src));
            text.push('x');
        }
        text.push_str(&dst.to_string());
        if let Some(promotion) = mv.get_promotion() {
            text.push('=');
            text.push(piece_char(promotion, Color::White));
        }
    } else {
        text.push(piece_char(piece, Color::White));
        text.push_str(&disambiguation(board, mv, piece));
        if board.piece_on(dst).is_some() {
            text.push('x');
        }
        text.push_str(&dst.to_string());
    }

    let next = board.make_move_new(mv);
    if next.status() == BoardStatus::Checkmate {
        text.push('#');
    } else if next.checkers().popcnt() > 0 {
        text.push('+');
    }
    text
}

/// Source file, rank or square needed to tell `mv` apart from other moves
/// of the same piece type to the same square.
fn disambiguation(board: &Board, mv: ChessMove, piece: Piece) -> String {
    let src = mv.get_source();
    let rivals: Vec<Square> = MoveGen::new_legal(board)
        .filter(|other| {
            other.get_dest() == mv.get_dest()
                && other.get_source() != src
                && board.piece_on(other.get_source()) == Some(piece)
        })
        .map(|other| other.get_source())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.get_file() != src.get_file()) {
        file_char(src).to_string()
    } else if rivals.iter().all(|sq| sq.get_rank() != src.get_rank()) {
        rank_char(src).to_string()
    } else {
        src.to_string()
    }
}

/// Strip annotations and normalise castling written with zeros.
fn normalise(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'))
        .replace('0', "O")
        .replace('=', "")
}

/// Read a move in SAN or UCI notation.
///
/// # Errors
/// Returns `ArenaError::InvalidMove` if the text names no legal move.
pub fn parse_move(board: &Board, text: &str) -> Result<ChessMove> {
    let wanted = normalise(text);
    let uci = text.trim().to_ascii_lowercase();

    MoveGen::new_legal(board)
        .find(|&mv| mv.to_string() == uci || normalise(&format_san(board, mv)) == wanted)
        .ok_or_else(|| {
            ArenaError::InvalidMove(format!(
                "{:?} is not a legal move in SAN or UCI notation",
                text.trim()
            ))
        })
}
