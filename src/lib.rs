//! Grid Snake - a deterministic snake simulation with obstacles
//!
//! This library provides:
//! - Core game logic (game module): state, tick algorithm, direction queue
//! - Terminal rendering (render module)
//! - Keyboard mapping (input module)
//! - Session metrics (metrics module)
//! - Driver loops for human play and the autopilot (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
