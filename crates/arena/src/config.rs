//! Command-line configuration.
//!
//! Every flag can also be set through an `ARENA_*` environment variable;
//! flags given on the command line win.

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Result};
use arena_core::ArenaError;
use arena_mcts::{
    config::{DEFAULT_EXPLORATION, DEFAULT_SIMULATIONS},
    MctsConfig,
};
use clap::Parser;

use crate::board::GameKind;

/// Who plays against the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Opponent {
    Human,
    Random,
    /// Path of a UCI chess engine executable.
    Uci(PathBuf),
}

impl FromStr for Opponent {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, ArenaError> {
        match s.trim() {
            "" => Err(ArenaError::InvalidConfig(
                "the engine must be Human, Random, or the path of a chess engine".into(),
            )),
            "Human" | "human" => Ok(Opponent::Human),
            "Random" | "random" => Ok(Opponent::Random),
            path => Ok(Opponent::Uci(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for Opponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opponent::Human => f.write_str("Human"),
            Opponent::Random => f.write_str("Random"),
            Opponent::Uci(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Play tic-tac-toe, connect-four or chess against a Monte Carlo Tree
/// Search agent.
#[derive(Parser, Debug, Clone)]
#[command(name = "arena")]
#[command(about = "Play a board game against a Monte Carlo Tree Search agent")]
pub struct ArenaConfig {
    /// Game to play: chess, tic_tac_toe, or connect4.
    #[arg(long, env = "ARENA_GAME")]
    pub game: GameKind,

    /// Opponent of the search: Human, Random, or the path of a UCI chess engine.
    #[arg(long, env = "ARENA_ENGINE", default_value = "Random")]
    pub engine: Opponent,

    /// Number of simulations per move.
    #[arg(long = "simul", env = "ARENA_SIMUL", default_value_t = DEFAULT_SIMULATIONS)]
    pub simulations: usize,

    /// Exploration constant C of the UCB1 formula.
    #[arg(long = "const", env = "ARENA_CONST", default_value_t = DEFAULT_EXPLORATION)]
    pub exploration: f32,

    /// Save the game to `<PATH>.pgn`.
    #[arg(long, env = "ARENA_PATH")]
    pub path: Option<PathBuf>,

    /// Print timing information.
    #[arg(long, env = "ARENA_TIME")]
    pub time: bool,

    /// Seed for side assignment, random moves and the search (random if unset).
    #[arg(long, env = "ARENA_SEED")]
    pub seed: Option<u64>,

    /// Thinking time given to a UCI engine per move, in milliseconds.
    #[arg(long, env = "ARENA_MOVETIME_MS", default_value_t = 100)]
    pub movetime_ms: u64,

    /// Stop rollouts after this many moves and score them as draws.
    #[arg(long, env = "ARENA_ROLLOUT_DEPTH")]
    pub rollout_depth: Option<usize>,

    /// Also save the game as `<PATH>.json`.
    #[arg(long, env = "ARENA_JSON")]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, env = "ARENA_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl ArenaConfig {
    /// Search settings for the MCTS player.
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig {
            num_simulations: self.simulations,
            exploration_constant: self.exploration,
            max_rollout_depth: self.rollout_depth,
        }
    }

    pub fn movetime(&self) -> Duration {
        Duration::from_millis(self.movetime_ms)
    }

    /// Reject combinations that cannot be played.
    pub fn validate(&self) -> Result<()> {
        self.mcts_config().validate()?;

        if let Opponent::Uci(path) = &self.engine {
            if self.game != GameKind::Chess {
                return Err(anyhow!(
                    "The used engine must be Human or Random for {}, not {}",
                    self.game,
                    path.display()
                ));
            }
        }
        if self.movetime_ms == 0 {
            return Err(anyhow!("movetime_ms must be positive"));
        }
        if self.rollout_depth == Some(0) {
            return Err(anyhow!("rollout_depth must be positive when set"));
        }
        if self.json && self.path.is_none() {
            return Err(anyhow!("--json needs --path to know where to write"));
        }
        Ok(())
    }
}
