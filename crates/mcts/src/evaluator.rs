//! Evaluation abstraction for MCTS.
//!
//! The `Evaluator` trait decides how a freshly expanded leaf is scored. The
//! stock implementation, `RolloutEvaluator`, plays uniformly random moves
//! until the game ends.

use arena_core::{GameState, Outcome, Result};
use rand::Rng;

/// Trait for scoring game positions.
pub trait Evaluator<G: GameState> {
    /// Play the position out and report how the game ended.
    ///
    /// The state is a private copy; the tree is never touched.
    fn evaluate(&mut self, state: G) -> Result<Outcome>;
}

/// Evaluator using uniformly random playouts.
pub struct RolloutEvaluator<R: Rng> {
    /// Random number generator for move choice.
    rng: R,

    /// Optional cap on playout length.
    max_depth: Option<usize>,
}

impl<R: Rng> RolloutEvaluator<R> {
    /// Create a rollout evaluator that plays every game to the end.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_depth: None,
        }
    }

    /// Create a rollout evaluator that stops after `max_depth` moves and
    /// scores unfinished playouts as draws.
    pub fn with_max_depth(rng: R, max_depth: Option<usize>) -> Self {
        Self { rng, max_depth }
    }

    /// Perform a random rollout from the given state.
    fn rollout<G: GameState>(&mut self, mut state: G) -> Result<Outcome> {
        let mut depth = 0;

        loop {
            if let Some(outcome) = state.outcome() {
                return Ok(outcome);
            }
            if self.max_depth.is_some_and(|max| depth >= max) {
                return Ok(Outcome::Draw);
            }

            let legal_moves = state.legal_moves();
            if legal_moves.is_empty() {
                // A non-terminal position without moves cannot be scored
                return Ok(Outcome::Draw);
            }

            let idx = self.rng.gen_range(0..legal_moves.len());
            state.apply(legal_moves[idx])?;
            depth += 1;
        }
    }
}

impl<G: GameState, R: Rng> Evaluator<G> for RolloutEvaluator<R> {
    fn evaluate(&mut self, state: G) -> Result<Outcome> {
        self.rollout(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{TicTacToeMove, TicTacToeState};
    use arena_core::Side;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rollout_reaches_terminal() {
        let mut evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(42));
        let state = TicTacToeState::new();

        for _ in 0..20 {
            let outcome = evaluator.evaluate(state.clone()).unwrap();
            assert!(matches!(outcome, Outcome::Win(_) | Outcome::Draw));
        }
    }

    #[test]
    fn test_rollout_on_terminal_state() {
        let mut evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(7));
        let state = TicTacToeState::from_rows(["XXX", "OO-", "---"]).unwrap();

        assert_eq!(
            evaluator.evaluate(state).unwrap(),
            Outcome::Win(Side::First)
        );
    }

    #[test]
    fn test_rollout_single_continuation() {
        // X to move with a single empty cell left: every rollout is the same game.
        // X O X
        // X O O
        // O X -
        let state = TicTacToeState::from_rows(["XOX", "XOO", "OX-"]).unwrap();
        assert_eq!(state.side_to_move(), Side::First);
        let mut evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(1));

        let outcome = evaluator.evaluate(state.clone()).unwrap();
        assert_eq!(outcome, state.after(TicTacToeMove(8)).unwrap().outcome().unwrap());
    }

    #[test]
    fn test_depth_cap_scores_draw() {
        let mut evaluator =
            RolloutEvaluator::with_max_depth(ChaCha8Rng::seed_from_u64(3), Some(0));
        let outcome = evaluator.evaluate(TicTacToeState::new()).unwrap();
        assert_eq!(outcome, Outcome::Draw);
    }

    #[test]
    fn test_rollout_does_not_touch_caller_state() {
        let mut evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(9));
        let state = TicTacToeState::new();
        let _ = evaluator.evaluate(state.clone()).unwrap();
        assert_eq!(state, TicTacToeState::new());
    }
}
