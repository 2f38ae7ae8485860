//! Play tic-tac-toe, connect-four or chess against a Monte Carlo Tree Search
//! agent.
//!
//! The search gets a random side; the opponent (a human at the terminal, a
//! random mover, or a UCI chess engine) gets the other. Moves and boards are
//! printed as the game goes, and the finished game can be saved as PGN
//! (chess) or a text log (the grid games), optionally with a JSON copy.

mod board;
mod config;
mod driver;
mod engine;
mod human;
mod player;
mod recorder;

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use arena_core::Side;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::board::Board;
use crate::config::{ArenaConfig, Opponent};
use crate::driver::{run_match, MatchOptions};
use crate::engine::UciEngine;
use crate::human::HumanMover;
use crate::player::{MctsMover, MoveSource, Player, RandomMover};
use crate::recorder::Recorder;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so the boards on stdout stay readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}

/// Build the opponent's move source.
fn opponent(config: &ArenaConfig, seed: u64) -> Result<Box<dyn MoveSource<Board>>> {
    Ok(match &config.engine {
        Opponent::Human => Box::new(HumanMover::stdio()),
        Opponent::Random => Box::new(RandomMover::new(ChaCha8Rng::seed_from_u64(seed))),
        Opponent::Uci(path) => Box::new(
            UciEngine::spawn(path, config.movetime())
                .with_context(|| format!("Failed to start chess engine {}", path.display()))?,
        ),
    })
}

fn run(config: &ArenaConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "seeding the game");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mcts_side = if rng.gen_bool(0.5) {
        Side::Second
    } else {
        Side::First
    };
    let mcts = MctsMover::new(config.mcts_config(), rng.gen());
    let opponent = opponent(config, rng.gen())?;

    let mut board = config.game.new_board();
    let mut recorder = Recorder::new(board.clone());
    let mut players: [Player<Board>; 2] = [
        Player::new(mcts_side, Box::new(mcts)),
        Player::new(mcts_side.opposite(), opponent),
    ];
    for player in &players {
        let key = match player.side() {
            Side::First => "White",
            Side::Second => "Black",
        };
        recorder.set_header(key, player.name());
    }

    let white = recorder.header("White").unwrap_or("?").to_string();
    let black = recorder.header("Black").unwrap_or("?").to_string();
    println!(
        "{}, MCTS param: c:{}, simul:{}",
        config.game, config.exploration, config.simulations
    );
    println!(
        "{}: {}, {}: {}",
        config.game.side_name(Side::First),
        white,
        config.game.side_name(Side::Second),
        black
    );
    println!();
    println!("-- Initial State --");
    println!("{}\n\n", board);

    let started = Instant::now();
    let options = MatchOptions {
        print_time: config.time,
    };
    let outcome = run_match(
        &mut board,
        &mut players,
        &mut recorder,
        options,
        &mut io::stdout().lock(),
    )?;
    info!(%outcome, plies = recorder.len(), "game over");

    if let Some(path) = &config.path {
        recorder.save(path)?;
        if config.json {
            recorder.save_json(path)?;
        }
    }

    if config.time {
        println!(
            "{}, C:{}, simul:{} - took {:.3} seconds",
            config.game,
            config.exploration,
            config.simulations,
            started.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let config = ArenaConfig::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, game = %config.game, engine = %config.engine, "arena starting");

    run(&config)
}
