//! Game records: PGN for chess, a plain text log for the grid games, and
//! an optional JSON dump of either.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use arena_core::Outcome;
use serde::Serialize;
use tracing::info;

use crate::board::{AnyMove, Board, GameKind};

/// One move as stored in the JSON record.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRecord {
    pub mv: String,
    pub elapsed_secs: f64,
    pub board: String,
}

/// Everything known about a finished (or abandoned) game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game: GameKind,
    pub headers: Vec<(String, String)>,
    pub moves: Vec<MoveRecord>,
    pub result: String,
}

struct Ply {
    mv: AnyMove,
    board: Board,
    elapsed: Duration,
}

/// Collects the moves of one game and writes them out.
pub struct Recorder {
    start: Board,
    headers: Vec<(String, String)>,
    plies: Vec<Ply>,
}

impl Recorder {
    /// A recorder for a game starting from `start`, with the standard
    /// header block filled in.
    pub fn new(start: Board) -> Self {
        let mut recorder = Self {
            start,
            headers: Vec::new(),
            plies: Vec::new(),
        };
        recorder.set_header("Event", "Example");
        recorder.set_header("Site", "?");
        recorder.set_header("Date", &pgn_date(SystemTime::now()));
        recorder.set_header("Round", "?");
        recorder.set_header("White", "?");
        recorder.set_header("Black", "?");
        recorder.set_header("Result", "*");
        recorder
    }

    /// Set a header, keeping its position if it already exists.
    pub fn set_header(&mut self, key: &str, value: &str) {
        match self.headers.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.headers.push((key.to_string(), value.to_string())),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Record a move with the position it produced and the time it took.
    pub fn record(&mut self, mv: AnyMove, board: &Board, elapsed: Duration) {
        self.plies.push(Ply {
            mv,
            board: board.clone(),
            elapsed,
        });
    }

    pub fn set_result(&mut self, outcome: Outcome) {
        self.set_header("Result", outcome.result_string());
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    fn current(&self) -> &Board {
        self.plies.last().map_or(&self.start, |ply| &ply.board)
    }

    fn header_block(&self, extra: &[(String, String)]) -> String {
        let mut out = String::new();
        for (key, value) in self.headers.iter().chain(extra) {
            let _ = writeln!(out, "[{} \"{}\"]", key, value.replace('"', "'"));
        }
        out
    }

    /// The record in the game's file format.
    pub fn render(&self) -> String {
        match self.current() {
            Board::Chess(state) => {
                let mut extra = Vec::new();
                if !state.is_standard_start() {
                    extra.push(("SetUp".to_string(), "1".to_string()));
                    extra.push(("FEN".to_string(), state.start_fen()));
                }
                let comments: Vec<String> = self
                    .plies
                    .iter()
                    .map(|ply| format_secs(ply.elapsed))
                    .collect();
                let result = self.header("Result").unwrap_or("*");
                format!(
                    "{}\n{}\n\n",
                    self.header_block(&extra),
                    state.movetext(&comments, result)
                )
            }
            _ => {
                let mut out = self.header_block(&[]);
                out.push('\n');
                for ply in &self.plies {
                    let _ = writeln!(
                        out,
                        "Action: {}, required time: {}",
                        ply.mv,
                        format_secs(ply.elapsed)
                    );
                    let _ = write!(out, "{}", ply.board);
                }
                out
            }
        }
    }

    /// The record as serializable data.
    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            game: self.start.kind(),
            headers: self.headers.clone(),
            moves: self
                .plies
                .iter()
                .map(|ply| MoveRecord {
                    mv: ply.mv.to_string(),
                    elapsed_secs: ply.elapsed.as_secs_f64(),
                    board: ply.board.to_string(),
                })
                .collect(),
            result: self.header("Result").unwrap_or("*").to_string(),
        }
    }

    /// Write `<base>.pgn`.
    pub fn save(&self, base: &Path) -> anyhow::Result<PathBuf> {
        let path = with_suffix(base, ".pgn");
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), plies = self.len(), "game saved");
        Ok(path)
    }

    /// Write `<base>.json`.
    pub fn save_json(&self, base: &Path) -> anyhow::Result<PathBuf> {
        let path = with_suffix(base, ".json");
        let json = serde_json::to_string_pretty(&self.to_record())
            .context("Failed to serialize the game record")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "game record saved as JSON");
        Ok(path)
    }
}

/// `base` with `suffix` appended, keeping any dots already in the name.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn format_secs(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}

/// PGN date (`YYYY.MM.DD`, UTC) of `now`.
pub fn pgn_date(now: SystemTime) -> String {
    match now.duration_since(UNIX_EPOCH) {
        Ok(since) => {
            let (year, month, day) = civil_from_days((since.as_secs() / 86_400) as i64);
            format!("{:04}.{:02}.{:02}", year, month, day)
        }
        Err(_) => "????.??.??".to_string(),
    }
}

/// Gregorian date of a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
