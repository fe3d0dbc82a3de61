//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine owns the state and advances it only when told to, so drivers and tests
//! call `tick` directly without waiting on a timer.

pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, StepResult, TickOutcome};
pub use food::FoodPlacer;
pub use state::{Cell, CollisionType, GameState, Position};
