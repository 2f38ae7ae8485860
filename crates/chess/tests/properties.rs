//! Property-based tests for the chess wrapper.
//!
//! Positions come from random legal play, so every input is reachable.

use arena_chess::{format_san, parse_move, ChessState};
use arena_core::{ArenaError, GameState, Outcome};
use arena_mcts::{Mcts, MctsConfig, RolloutEvaluator};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// =============================================================================
// Strategies for generating positions
// =============================================================================

/// Generate a position by making random moves from the starting position.
fn arb_valid_position() -> impl Strategy<Value = ChessState> {
    proptest::collection::vec(0usize..256, 0..60).prop_map(|move_indices| {
        let mut state = ChessState::new();
        for idx in move_indices {
            let moves = state.legal_moves();
            if moves.is_empty() {
                break;
            }
            state.apply(moves[idx % moves.len()]).unwrap();
        }
        state
    })
}

// =============================================================================
// Notation
// =============================================================================

proptest! {
    /// Every legal move reads back from its own SAN
    #[test]
    fn prop_san_roundtrip(state in arb_valid_position()) {
        let board = *state.board();
        for mv in state.legal_moves() {
            let san = format_san(&board, mv);
            prop_assert_eq!(parse_move(&board, &san).unwrap(), mv, "{} in {}", san, state.fen());
        }
    }

    /// Every legal move reads back from its UCI spelling
    #[test]
    fn prop_uci_roundtrip(state in arb_valid_position()) {
        for mv in state.legal_moves() {
            prop_assert_eq!(state.parse_move(&mv.to_string()).unwrap(), mv);
        }
    }

    /// SAN strings are unique within a position
    #[test]
    fn prop_san_unique(state in arb_valid_position()) {
        let mut sans: Vec<String> = state
            .legal_moves()
            .into_iter()
            .map(|mv| state.san(mv))
            .collect();
        let count = sans.len();
        sans.sort();
        sans.dedup();
        prop_assert_eq!(sans.len(), count);
    }

    /// Replaying the UCI position command rebuilds the same position
    #[test]
    fn prop_uci_position_replays(state in arb_valid_position()) {
        let command = state.uci_position();
        let rest = command.strip_prefix("fen ").unwrap();
        let (fen, moves) = match rest.split_once(" moves ") {
            Some((fen, moves)) => (fen, moves.split_whitespace().collect()),
            None => (rest, Vec::new()),
        };

        let mut replay = ChessState::from_fen(fen).unwrap();
        for text in moves {
            let mv = replay.parse_move(text).unwrap();
            replay.apply(mv).unwrap();
        }
        prop_assert_eq!(replay.fen(), state.fen());
    }

    /// The PGN movetext holds one SAN token per move played
    #[test]
    fn prop_movetext_lists_every_move(state in arb_valid_position()) {
        let text = state.movetext(&[], "*");
        for san in state.san_history() {
            prop_assert!(text.contains(&san));
        }
        prop_assert!(text.ends_with('*'));
        prop_assert_eq!(state.san_history().len(), state.moves().len());
    }
}

// =============================================================================
// Game state
// =============================================================================

proptest! {
    /// Terminal positions have no moves and an outcome, others the reverse
    #[test]
    fn prop_outcome_matches_moves(state in arb_valid_position()) {
        prop_assert_eq!(state.legal_moves().is_empty(), state.outcome().is_some());
        prop_assert_eq!(state.termination().is_some(), state.is_terminal());
        if let Some(Outcome::Win(winner)) = state.outcome() {
            prop_assert_eq!(winner, state.side_to_move().opposite());
        }
    }

    /// Applying a move to a clone leaves the original untouched
    #[test]
    fn prop_clone_independent(state in arb_valid_position()) {
        let snapshot = state.clone();
        if let Some(&mv) = state.legal_moves().first() {
            let mut clone = state.clone();
            clone.apply(mv).unwrap();
            prop_assert_ne!(clone.fen(), state.fen());
            prop_assert_eq!(clone.moves().len(), state.moves().len() + 1);
        }
        prop_assert_eq!(state, snapshot);
    }

    /// A move is accepted exactly when it is in the legal list
    #[test]
    fn prop_check_move_agrees_with_legal_moves(state in arb_valid_position()) {
        let legal = state.legal_moves();
        for mv in &legal {
            prop_assert!(state.check_move(*mv).is_ok());
        }

        // Moves legal in the starting position but not here must be refused
        let start = ChessState::new();
        for mv in start.legal_moves() {
            if !legal.contains(&mv) {
                let mut copy = state.clone();
                prop_assert!(matches!(copy.apply(mv), Err(ArenaError::InvalidMove(_))));
                prop_assert_eq!(&copy, &state);
            }
        }
    }

    /// The side to move alternates with every move
    #[test]
    fn prop_side_alternates(state in arb_valid_position()) {
        for mv in state.legal_moves().into_iter().take(5) {
            let next = state.after(mv).unwrap();
            prop_assert_eq!(next.side_to_move(), state.side_to_move().opposite());
        }
    }
}

// =============================================================================
// Search on chess
// =============================================================================

#[test]
fn test_search_returns_legal_move() {
    let state = ChessState::new();
    let config = MctsConfig {
        num_simulations: 8,
        max_rollout_depth: Some(40),
        ..MctsConfig::default()
    };
    let evaluator = RolloutEvaluator::with_max_depth(
        ChaCha8Rng::seed_from_u64(1),
        config.max_rollout_depth,
    );
    let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(0));

    let result = mcts.search(&state).unwrap();
    assert!(state.legal_moves().contains(&result.best_move));
    assert_eq!(result.total_visits(), 8);
}

#[test]
fn test_search_finds_mate_in_one() {
    // Qxf7# ends the game at once
    let state = ChessState::from_fen(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
    )
    .unwrap();
    let config = MctsConfig {
        num_simulations: 400,
        max_rollout_depth: Some(20),
        ..MctsConfig::default()
    };
    let evaluator = RolloutEvaluator::with_max_depth(
        ChaCha8Rng::seed_from_u64(3),
        config.max_rollout_depth,
    );
    let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(2));

    let result = mcts.search(&state).unwrap();
    assert_eq!(state.san(result.best_move), "Qxf7#");
}

#[test]
fn test_search_rejects_finished_game() {
    let state = ChessState::from_fen(
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
    )
    .unwrap();
    let mut mcts = Mcts::new(
        MctsConfig::with_simulations(10),
        RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(0)),
        ChaCha8Rng::seed_from_u64(0),
    );
    assert!(matches!(mcts.search(&state), Err(ArenaError::NoLegalMoves)));
}
