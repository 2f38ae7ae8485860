//! Move sources and the players that wrap them.

use arena_core::{ArenaError, GameState, Result, Side};
use arena_mcts::{Mcts, MctsConfig, RolloutEvaluator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Anything that can pick a move: a search, a person, another program.
pub trait MoveSource<G: GameState> {
    /// Name shown in announcements and game records.
    fn name(&self) -> &str;

    /// Choose a move for the side to move in `state`.
    fn play(&mut self, state: &G) -> Result<G::Move>;

    /// Release whatever the source holds. Called once when the game is over.
    fn quit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Plays a uniformly random legal move.
pub struct RandomMover<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomMover<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<G: GameState, R: Rng> MoveSource<G> for RandomMover<R> {
    fn name(&self) -> &str {
        "Random"
    }

    fn play(&mut self, state: &G) -> Result<G::Move> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(ArenaError::NoLegalMoves);
        }
        Ok(moves[self.rng.gen_range(0..moves.len())])
    }
}

/// Plays the most visited move of a fresh search.
///
/// Every call builds a new tree; nothing is kept between moves. Each search
/// draws its own seeds from `seeds`, so a whole game replays exactly from
/// one starting seed.
pub struct MctsMover {
    config: MctsConfig,
    seeds: ChaCha8Rng,
}

impl MctsMover {
    pub fn new(config: MctsConfig, seed: u64) -> Self {
        Self {
            config,
            seeds: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<G: GameState> MoveSource<G> for MctsMover {
    fn name(&self) -> &str {
        "MCTS"
    }

    fn play(&mut self, state: &G) -> Result<G::Move> {
        let seed: u64 = self.seeds.gen();
        let evaluator = RolloutEvaluator::with_max_depth(
            ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            self.config.max_rollout_depth,
        );
        let mut mcts = Mcts::new(self.config.clone(), evaluator, ChaCha8Rng::seed_from_u64(seed));

        let result = mcts.search(state)?;
        info!(
            best_move = %result.best_move,
            visits = result.visits(result.best_move),
            root_value = %result.root_value,
            tree_size = result.tree_size,
            "MCTS picked a move"
        );
        Ok(result.best_move)
    }
}

/// One side of the board and the source choosing its moves.
pub struct Player<G: GameState> {
    side: Side,
    source: Box<dyn MoveSource<G>>,
}

impl<G: GameState> Player<G> {
    pub fn new(side: Side, source: Box<dyn MoveSource<G>>) -> Self {
        Self { side, source }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// Ask the source for a move and make sure it can be played.
    ///
    /// # Errors
    /// - `ArenaError::InvalidMove` if it is not this player's turn or the
    ///   source returned an illegal move
    /// - Whatever the source itself fails with
    pub fn play(&mut self, state: &G) -> Result<G::Move> {
        if state.side_to_move() != self.side {
            return Err(ArenaError::InvalidMove(format!(
                "{} plays {} but it is {}'s turn",
                self.name(),
                self.side,
                state.side_to_move()
            )));
        }

        let mv = self.source.play(state)?;
        state.check_move(mv)?;
        debug!(player = self.name(), side = %self.side, mv = %mv, "move chosen");
        Ok(mv)
    }

    pub fn quit(&mut self) -> Result<()> {
        self.source.quit()
    }
}
