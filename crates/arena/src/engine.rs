//! External chess engines spoken to over UCI.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use arena_chess::{ChessMove, ChessState};
use arena_core::{ArenaError, GameState, Result};
use tracing::{debug, info, warn};

use crate::board::{AnyMove, Board};
use crate::player::MoveSource;

/// How long the engine may stay silent beyond its thinking time.
const DEFAULT_GRACE: Duration = Duration::from_secs(10);

/// A UCI engine running as a child process.
///
/// The engine is asked for a move with a fixed thinking time. `quit` is
/// sent exactly once, either by the game driver or on drop. Output is read
/// on a separate thread so a silent engine times out instead of blocking
/// the game.
pub struct UciEngine {
    name: String,
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<io::Result<String>>,
    movetime: Duration,
    grace: Duration,
    quit_sent: bool,
}

/// Forward every line the engine prints until its output closes.
fn spawn_reader(stdout: ChildStdout) -> Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

fn comm_error(what: impl std::fmt::Display) -> ArenaError {
    ArenaError::EngineCommunication(what.to_string())
}

impl UciEngine {
    /// Start the engine at `path` and run the UCI handshake.
    ///
    /// # Errors
    /// Returns `ArenaError::EngineCommunication` if the process cannot be
    /// started or does not complete the handshake.
    pub fn spawn(path: &Path, movetime: Duration) -> Result<Self> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| comm_error(format!("cannot start {}: {}", path.display(), e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| comm_error("engine stdin is not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| comm_error("engine stdout is not piped"))?;

        let mut engine = Self {
            name: path.display().to_string(),
            child,
            stdin,
            lines: spawn_reader(stdout),
            movetime,
            grace: DEFAULT_GRACE,
            quit_sent: false,
        };

        engine.send("uci")?;
        for line in engine.read_until("uciok", Duration::ZERO)? {
            if let Some(id) = line.strip_prefix("id name ") {
                info!(engine = %engine.name, id, "engine identified");
            }
        }
        engine.send("isready")?;
        engine.read_until("readyok", Duration::ZERO)?;
        engine.send("ucinewgame")?;

        Ok(engine)
    }

    fn send(&mut self, command: &str) -> Result<()> {
        debug!(engine = %self.name, command, ">> engine");
        writeln!(self.stdin, "{}", command)
            .and_then(|()| self.stdin.flush())
            .map_err(|e| comm_error(format!("cannot write to {}: {}", self.name, e)))
    }

    fn read_line(&mut self, deadline: Instant) -> Result<String> {
        let wait = deadline.saturating_duration_since(Instant::now());
        let line = match self.lines.recv_timeout(wait) {
            Ok(line) => {
                line.map_err(|e| comm_error(format!("cannot read from {}: {}", self.name, e)))?
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(comm_error(format!("{} stopped answering", self.name)))
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(comm_error(format!("{} closed its output", self.name)))
            }
        };
        let line = line.trim().to_string();
        debug!(engine = %self.name, line = %line, "<< engine");
        Ok(line)
    }

    /// Read lines until one starts with `token`; return every line read,
    /// the matching one last.
    ///
    /// The engine gets `thinking` plus the grace period to answer.
    fn read_until(&mut self, token: &str, thinking: Duration) -> Result<Vec<String>> {
        let deadline = Instant::now() + thinking + self.grace;
        let mut lines = Vec::new();
        loop {
            let line = self.read_line(deadline)?;
            let done = line.split_whitespace().next() == Some(token);
            lines.push(line);
            if done {
                return Ok(lines);
            }
        }
    }

    /// Ask the engine for its move in `state`.
    ///
    /// # Errors
    /// - `ArenaError::NoLegalMoves` if the engine reports no move
    /// - `ArenaError::EngineCommunication` on I/O failure or an illegal reply
    pub fn best_move(&mut self, state: &ChessState) -> Result<ChessMove> {
        self.send(&format!("position {}", state.uci_position()))?;
        self.send(&format!("go movetime {}", self.movetime.as_millis()))?;

        let lines = self.read_until("bestmove", self.movetime)?;
        let reply = lines
            .last()
            .and_then(|line| line.split_whitespace().nth(1))
            .ok_or_else(|| comm_error(format!("{} sent an empty bestmove", self.name)))?;

        if reply == "(none)" || reply == "0000" {
            return Err(ArenaError::NoLegalMoves);
        }
        state.parse_move(reply).map_err(|_| {
            comm_error(format!(
                "{} answered {} which is not legal in {}",
                self.name,
                reply,
                state.fen()
            ))
        })
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.quit_sent {
            return Ok(());
        }
        self.quit_sent = true;
        self.send("quit")?;

        let deadline = Instant::now() + self.grace;
        loop {
            let exited = self
                .child
                .try_wait()
                .map_err(|e| comm_error(format!("cannot wait for {}: {}", self.name, e)))?;
            if let Some(status) = exited {
                debug!(engine = %self.name, %status, "engine exited");
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!(engine = %self.name, "engine ignored quit, killing it");
                let _ = self.child.kill();
                let _ = self.child.wait();
                return Ok(());
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl MoveSource<Board> for UciEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn play(&mut self, board: &Board) -> Result<AnyMove> {
        match board {
            Board::Chess(state) => self.best_move(state).map(AnyMove::Chess),
            other => Err(ArenaError::UnsupportedGame(format!(
                "{} (UCI engines only play chess)",
                other.kind()
            ))),
        }
    }

    fn quit(&mut self) -> Result<()> {
        self.shutdown()
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        if self.quit_sent {
            return;
        }
        if let Err(err) = self.shutdown() {
            warn!(engine = %self.name, error = %err, "engine did not quit cleanly");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
