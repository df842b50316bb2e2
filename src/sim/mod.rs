//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per tick, no wall-clock time
//! - Seeded RNG only
//! - No rendering, socket or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod physics;
pub mod score;
pub mod state;
pub mod tick;

pub use autopilot::wants_jump;
pub use collision::{Rect, detect_collision, first_collision};
pub use physics::{game_speed, spawn_probability};
pub use score::ScoreTracker;
pub use state::{GameEvent, GamePhase, GameState, Obstacle, Player};
pub use tick::{JumpOutcome, TickInput, handle_jump, tick};
