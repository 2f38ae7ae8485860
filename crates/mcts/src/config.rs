//! MCTS configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo Tree Search algorithm.

use arena_core::{ArenaError, Result};

/// Default number of simulations per search.
pub const DEFAULT_SIMULATIONS: usize = 200;

/// Default UCB1 exploration constant (sqrt(2)).
pub const DEFAULT_EXPLORATION: f32 = std::f32::consts::SQRT_2;

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations per search. Must be positive.
    pub num_simulations: usize,

    /// UCB1 exploration constant `c`.
    /// Higher values favor rarely visited children, 0 is pure exploitation.
    pub exploration_constant: f32,

    /// Optional cap on rollout length. A rollout that hits the cap before
    /// the game ends is scored as a draw. `None` plays every rollout out.
    pub max_rollout_depth: Option<usize>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: DEFAULT_SIMULATIONS,
            exploration_constant: DEFAULT_EXPLORATION,
            max_rollout_depth: None,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of simulations.
    pub fn with_simulations(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            ..Default::default()
        }
    }

    /// Replace the exploration constant.
    pub fn with_exploration(mut self, exploration_constant: f32) -> Self {
        self.exploration_constant = exploration_constant;
        self
    }

    /// Check the invariants the search relies on.
    ///
    /// # Errors
    /// Returns `ArenaError::InvalidConfig` if the simulation count is zero or
    /// the exploration constant is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if self.num_simulations == 0 {
            return Err(ArenaError::InvalidConfig(
                "number of simulations must be positive".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(ArenaError::InvalidConfig(format!(
                "exploration constant must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}
