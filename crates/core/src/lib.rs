//! Arena Core - Game abstractions and common types
//!
//! This crate provides the `GameState` trait that every playable variant
//! implements, so one search engine can drive structurally different games.
//!
//! # Types
//!
//! - [`GameState`] - Trait for game positions
//! - [`Side`] / [`Mark`] - Players and grid contents
//! - [`Outcome`] - Win or draw of a finished game
//! - [`Reward`] - Game value in [-1, 1]

mod error;
mod game;
mod types;

pub use error::{ArenaError, Result};
pub use game::GameState;
pub use types::{Mark, Outcome, Reward, Side};
