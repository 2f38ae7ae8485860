//! The game loop: alternate players until the board is terminal.

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use arena_core::{GameState, Outcome, Side};
use tracing::{info, warn};

use crate::board::Board;
use crate::player::Player;
use crate::recorder::Recorder;

/// What the loop prints besides the moves and boards.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchOptions {
    /// Print how long every move took.
    pub print_time: bool,
}

fn player_for(players: &mut [Player<Board>; 2], side: Side) -> Result<&mut Player<Board>> {
    players
        .iter_mut()
        .find(|p| p.side() == side)
        .with_context(|| format!("No player for {}", side))
}

/// Play `board` to the end, announcing every move on `out` and recording it.
///
/// Players are not shut down here; see [`run_match`].
pub fn play_game<W: Write>(
    board: &mut Board,
    players: &mut [Player<Board>; 2],
    recorder: &mut Recorder,
    options: MatchOptions,
    out: &mut W,
) -> Result<Outcome> {
    let kind = board.kind();

    while !board.is_terminal() {
        let side = board.side_to_move();
        let player = player_for(players, side)?;

        let started = Instant::now();
        let mv = player
            .play(board)
            .with_context(|| format!("{} failed to produce a move", player.name()))?;
        let elapsed = started.elapsed();

        writeln!(out, "{}'s move: {}", player.name(), mv)?;
        if options.print_time {
            writeln!(out, "Move computed in {:.6} seconds", elapsed.as_secs_f64())?;
        }

        board.apply(mv)?;
        recorder.record(mv, board, elapsed);
        info!(ply = recorder.len(), side = %side, mv = %mv, ?elapsed, "move played");

        writeln!(out, "{}\n\n", board)?;
        writeln!(out, "{}'s turn", kind.side_name(board.side_to_move()))?;
    }

    let outcome = board.result()?;
    recorder.set_result(outcome);
    match outcome {
        Outcome::Draw => writeln!(out, "Draw")?,
        Outcome::Win(_) => writeln!(out, "The winner is {}", outcome.result_string())?,
    }
    Ok(outcome)
}

/// [`play_game`], then shut both players down whether or not the game
/// finished cleanly.
pub fn run_match<W: Write>(
    board: &mut Board,
    players: &mut [Player<Board>; 2],
    recorder: &mut Recorder,
    options: MatchOptions,
    out: &mut W,
) -> Result<Outcome> {
    let result = play_game(board, players, recorder, options, out);

    let mut quit_error = None;
    for player in players.iter_mut() {
        if let Err(err) = player.quit() {
            warn!(player = player.name(), error = %err, "player did not quit cleanly");
            quit_error.get_or_insert(err);
        }
    }

    let outcome = result?;
    if let Some(err) = quit_error {
        return Err(err).context("Failed to shut down a player");
    }
    Ok(outcome)
}
