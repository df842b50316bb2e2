//! AI Runner - a side-scrolling runner with server-pushed difficulty
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring)
//! - `net`: Difficulty channel (wire protocol, reconnect policy, socket)
//! - `driver`: Frame-synchronized tick scheduling
//! - `session`: Per-tick pipeline and game-over orchestration
//! - `render`: Render adapter trait and the canvas implementation
//! - `input`: Jump key and button bindings
//! - `config`: Runtime configuration

pub mod config;
pub mod driver;
pub mod input;
pub mod net;
pub mod render;
pub mod session;
pub mod sim;

pub use config::{ConfigError, ReconnectConfig, RunnerConfig};
pub use driver::{Driver, FrameFlow, FrameScheduler};
pub use session::{FrameOutcome, GameOverNotice, Session};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (canvas pixels)
    pub const FIELD_WIDTH: f32 = 500.0;
    pub const FIELD_HEIGHT: f32 = 200.0;

    /// Top edge of the player when standing on the ground
    pub const GROUND_Y: f32 = 160.0;

    /// Player defaults - x never changes
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 25.0;
    pub const PLAYER_HEIGHT: f32 = 25.0;
    /// Initial vertical velocity of a jump (negative = up)
    pub const JUMP_VELOCITY: f32 = -10.0;

    /// Downward acceleration, units/tick²
    pub const GRAVITY: f32 = 0.5;

    /// Obstacle defaults
    pub const OBSTACLE_Y: f32 = 175.0;
    pub const OBSTACLE_WIDTH: f32 = 15.0;
    pub const OBSTACLE_HEIGHT: f32 = 25.0;

    /// Per-tick spawn probability at difficulty 1
    pub const BASE_SPAWN_RATE: f64 = 0.015;
    /// Obstacle speed at difficulty 0; actual speed is this plus difficulty
    pub const BASE_SPEED: f32 = 3.0;

    /// Simulation ticks per score point
    pub const TICKS_PER_POINT: u64 = 50;

    /// Lowest difficulty the service may push
    pub const MIN_DIFFICULTY: u32 = 1;

    /// Pause between collision and the end-of-session notice
    pub const GAME_OVER_DELAY_MS: u32 = 200;
}
