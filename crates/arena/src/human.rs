//! Moves typed in by a person.

use std::io::{self, BufRead, Write};

use arena_core::{ArenaError, GameState, Result};
use tracing::debug;

use crate::board::{AnyMove, Board, GameKind};
use crate::player::MoveSource;

/// Reads moves from `input`, prompting on `output`, until a legal one
/// arrives.
pub struct HumanMover<I: BufRead, O: Write> {
    input: I,
    output: O,
}

impl HumanMover<io::StdinLock<'static>, io::Stdout> {
    /// A human at the terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> HumanMover<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}:", prompt)?;
        self.output.flush()?;

        // Undecodable bytes become part of a move that fails to parse, so
        // only a closed input ends the game
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Err(ArenaError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a move",
            )));
        }
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }

    #[cfg(test)]
    fn output(&self) -> &O {
        &self.output
    }
}

impl<I: BufRead, O: Write> MoveSource<Board> for HumanMover<I, O> {
    fn name(&self) -> &str {
        "Human"
    }

    fn play(&mut self, board: &Board) -> Result<AnyMove> {
        loop {
            let mut answers = Vec::new();
            for prompt in board.prompts() {
                answers.push(self.ask(prompt)?);
            }
            let text = answers.join(" ");

            match board
                .parse_move(&text)
                .and_then(|mv| board.check_move(mv).map(|()| mv))
            {
                Ok(mv) => return Ok(mv),
                Err(err) => {
                    debug!(input = %text, error = %err, "rejected human move");
                    if board.kind() == GameKind::Chess {
                        writeln!(self.output, "{} is not a valid move.", text)?;
                    } else {
                        writeln!(self.output, "{}", err)?;
                        writeln!(self.output, "Insert the values again")?;
                    }
                }
            }
        }
    }
}
