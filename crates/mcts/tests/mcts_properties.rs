//! Property-based tests for the search and the in-crate games.
//!
//! - Every completed search credits exactly one root child per simulation
//! - The returned move is legal and is the most visited child
//! - Untried moves are exhausted before any child is revisited
//! - Same seed, same search
//! - Clones never alias, illegal moves never change a position

use arena_core::{ArenaError, GameState};
use arena_mcts::{
    games::{ConnectFourMove, ConnectFourState, TicTacToeMove, TicTacToeState},
    Mcts, MctsConfig, RolloutEvaluator,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// =============================================================================
// Strategies for generating test inputs
// =============================================================================

/// Generate a random seed for MCTS
fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Generate a random number of simulations (1-150 for fast tests)
fn arb_simulations() -> impl Strategy<Value = usize> {
    1usize..150
}

/// Play `num_moves` random moves from `state`, stopping early at a terminal position
fn random_walk<G: GameState>(mut state: G, num_moves: usize, seed: u64) -> G {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..num_moves {
        let moves = state.legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        state.apply(mv).expect("legal move must apply");
    }
    state
}

/// Generate a random tic-tac-toe position by making random moves
fn arb_tictactoe_position() -> impl Strategy<Value = TicTacToeState> {
    (0usize..9, arb_seed()).prop_map(|(n, seed)| random_walk(TicTacToeState::new(), n, seed))
}

/// Generate a random connect-four position by making random moves
fn arb_connect_four_position() -> impl Strategy<Value = ConnectFourState> {
    (0usize..42, arb_seed()).prop_map(|(n, seed)| random_walk(ConnectFourState::new(), n, seed))
}

fn create_mcts(
    seed: u64,
    simulations: usize,
) -> Mcts<TicTacToeState, RolloutEvaluator<ChaCha8Rng>, ChaCha8Rng> {
    let config = MctsConfig::with_simulations(simulations);
    let evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)));
    Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(seed))
}

// =============================================================================
// Search invariants
// =============================================================================

proptest! {
    /// Each simulation adds exactly one visit below the root
    #[test]
    fn prop_root_child_visits_sum_to_simulations(
        seed in arb_seed(),
        simulations in arb_simulations(),
        state in arb_tictactoe_position()
    ) {
        if state.is_terminal() {
            return Ok(());
        }

        let result = create_mcts(seed, simulations).search(&state).unwrap();

        prop_assert_eq!(result.total_visits() as usize, simulations);
    }

    /// The returned move is legal in the searched position
    #[test]
    fn prop_best_move_is_legal(
        seed in arb_seed(),
        simulations in arb_simulations(),
        state in arb_connect_four_position()
    ) {
        if state.is_terminal() {
            return Ok(());
        }

        let config = MctsConfig::with_simulations(simulations);
        let evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(seed ^ 0xA5));
        let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(seed));
        let result = mcts.search(&state).unwrap();

        prop_assert!(state.legal_moves().contains(&result.best_move));
        prop_assert_eq!(result.total_visits() as usize, simulations);
    }

    /// Best move should correspond to the child with the highest visit count
    #[test]
    fn prop_best_move_is_max_visits(
        seed in arb_seed(),
        simulations in arb_simulations(),
        state in arb_tictactoe_position()
    ) {
        if state.is_terminal() {
            return Ok(());
        }

        let result = create_mcts(seed, simulations).search(&state).unwrap();
        let max_visits = result.visit_counts.iter().map(|(_, c)| *c).max();

        prop_assert_eq!(Some(result.visits(result.best_move)), max_visits);
    }

    /// With no more simulations than legal moves, every simulation expands a
    /// new root child and no child is visited twice
    #[test]
    fn prop_untried_moves_exhausted_first(
        seed in arb_seed(),
        state in arb_tictactoe_position()
    ) {
        if state.is_terminal() {
            return Ok(());
        }

        let legal = state.legal_moves().len();
        let result = create_mcts(seed, legal).search(&state).unwrap();

        prop_assert_eq!(result.visit_counts.len(), legal);
        prop_assert!(result.visit_counts.iter().all(|(_, c)| *c == 1));
    }

    /// Same seed should produce identical results
    #[test]
    fn prop_deterministic(
        seed in arb_seed(),
        simulations in arb_simulations(),
        state in arb_tictactoe_position()
    ) {
        if state.is_terminal() {
            return Ok(());
        }

        let result1 = create_mcts(seed, simulations).search(&state).unwrap();
        let result2 = create_mcts(seed, simulations).search(&state).unwrap();

        prop_assert_eq!(result1.best_move, result2.best_move);
        prop_assert_eq!(result1.visit_counts, result2.visit_counts);
        prop_assert!((result1.root_value.get() - result2.root_value.get()).abs() < 1e-6);
    }

    /// Searching never changes the caller's position
    #[test]
    fn prop_search_leaves_state_untouched(
        seed in arb_seed(),
        state in arb_connect_four_position()
    ) {
        if state.is_terminal() {
            return Ok(());
        }

        let before = state.clone();
        let config = MctsConfig::with_simulations(20);
        let evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(seed));
        let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(seed));
        mcts.search(&state).unwrap();

        prop_assert_eq!(state, before);
    }

    /// Terminal positions cannot be searched
    #[test]
    fn prop_terminal_positions_rejected(
        seed in arb_seed(),
    ) {
        let state = random_walk(TicTacToeState::new(), 9, seed);
        prop_assume!(state.is_terminal());

        let result = create_mcts(seed, 10).search(&state);
        prop_assert!(matches!(result, Err(ArenaError::NoLegalMoves)));
    }
}

// =============================================================================
// Game-state invariants
// =============================================================================

proptest! {
    /// A clone and the original stay in lockstep under the same moves
    #[test]
    fn prop_clone_round_trip_tictactoe(
        start in arb_tictactoe_position(),
        num_moves in 0usize..9,
        seed in arb_seed(),
    ) {
        let mut original = start;
        let mut clone = original.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = original.legal_moves();
            prop_assert_eq!(&moves, &clone.legal_moves());
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            original.apply(mv).unwrap();
            clone.apply(mv).unwrap();

            prop_assert_eq!(original.is_terminal(), clone.is_terminal());
            prop_assert_eq!(original.winner(), clone.winner());
        }
        prop_assert_eq!(&original, &clone);

        // Moving only the clone leaves the original alone
        let before = original.clone();
        if let Some(&mv) = clone.legal_moves().first() {
            clone.apply(mv).unwrap();
            prop_assert_eq!(&original, &before);
            prop_assert_ne!(&original, &clone);
        }
    }

    #[test]
    fn prop_clone_round_trip_connect_four(
        num_moves in 0usize..42,
        seed in arb_seed(),
    ) {
        let original = random_walk(ConnectFourState::new(), num_moves, seed);
        let snapshot = original.clone();
        let mut clone = original.clone();

        for mv in clone.legal_moves().into_iter().take(1) {
            clone.apply(mv).unwrap();
        }

        prop_assert_eq!(&original, &snapshot);
        prop_assert_eq!(original.legal_moves(), snapshot.legal_moves());
        prop_assert_eq!(original.outcome(), snapshot.outcome());
    }

    /// Illegal moves fail with InvalidMove and leave the position unchanged
    #[test]
    fn prop_illegal_tictactoe_move_rejected(
        state in arb_tictactoe_position(),
        cell in 0u8..12,
    ) {
        let mv = TicTacToeMove(cell);
        prop_assume!(!state.legal_moves().contains(&mv));

        let mut after = state.clone();
        let result = after.apply(mv);

        prop_assert!(matches!(result, Err(ArenaError::InvalidMove(_))));
        prop_assert_eq!(after, state);
    }

    #[test]
    fn prop_illegal_connect_four_move_rejected(
        state in arb_connect_four_position(),
        row in 0u8..7,
        col in 0u8..8,
    ) {
        let mv = ConnectFourMove { row, col };
        prop_assume!(!state.legal_moves().contains(&mv));

        let mut after = state.clone();
        let result = after.apply(mv);

        prop_assert!(matches!(result, Err(ArenaError::InvalidMove(_))));
        prop_assert_eq!(after, state);
    }

    /// Terminal checks are idempotent
    #[test]
    fn prop_outcome_idempotent(state in arb_connect_four_position()) {
        let first = state.outcome();
        prop_assert_eq!(state.outcome(), first);
        prop_assert_eq!(state.is_terminal(), first.is_some());
        prop_assert_eq!(state.legal_moves().is_empty(), first.is_some());
    }
}
