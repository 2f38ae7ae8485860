//! Monte Carlo Tree Search over any `arena_core::GameState`.
//!
//! # Features
//!
//! - **Generic**: Works with any `GameState` implementation
//! - **UCB1 Selection**: Unvisited children first, then mean reward plus an
//!   exploration bonus
//! - **Evaluator Abstraction**: Leaves are scored by random rollouts by default
//! - **Reproducible**: All randomness comes from injected, seedable RNGs
//!
//! # Example
//!
//! ```
//! use arena_mcts::{games::TicTacToeState, Mcts, MctsConfig, RolloutEvaluator};
//! use arena_core::GameState;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let state = TicTacToeState::new();
//!
//! let config = MctsConfig::with_simulations(100);
//! let evaluator = RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(43));
//! let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(42));
//!
//! let result = mcts.search(&state).unwrap();
//! assert!(state.legal_moves().contains(&result.best_move));
//! assert_eq!(result.total_visits(), 100);
//! ```

pub mod config;
pub mod evaluator;
pub mod games;
mod node;
pub mod search;
mod tree;

pub use config::MctsConfig;
pub use evaluator::{Evaluator, RolloutEvaluator};
pub use search::{Mcts, SearchResult};
