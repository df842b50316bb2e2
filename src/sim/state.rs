//! Game state and core simulation types
//!
//! Everything a session owns lives here; it is discarded wholesale on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::score::ScoreTracker;
use crate::consts::*;

/// Current phase of a session
///
/// Ordering follows the only legal direction of travel, so a phase never
/// compares lower than one it has already been in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GamePhase {
    /// Waiting for the first jump; nothing moves
    Ready,
    /// Active gameplay
    Running,
    /// Collision happened; terminal
    Over,
}

impl GamePhase {
    /// The "game started" latch
    pub fn is_started(self) -> bool {
        self != GamePhase::Ready
    }

    /// The "game over" latch
    pub fn is_over(self) -> bool {
        self == GamePhase::Over
    }
}

/// Something that happened during a tick, drained by the session each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// First jump input moved the session out of `Ready`
    Started,
    /// Player left the ground
    Jumped,
    /// Difficulty read from the channel differs from the previous tick's
    DifficultyChanged { from: u32, to: u32 },
    /// Derived score moved to a new value
    ScoreChanged { score: u32 },
    /// Player hit an obstacle; the session is over
    Collision { final_score: u32 },
}

/// The player avatar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive = falling)
    pub velocity_y: f32,
    pub jumping: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, GROUND_Y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            velocity_y: 0.0,
            jumping: false,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Launch a jump if standing on the ground
    pub fn try_jump(&mut self) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.velocity_y = JUMP_VELOCITY;
        true
    }
}

/// A ground-level obstacle scrolling toward the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// Obstacle at the standard ground offset and size
    pub fn at(x: f32) -> Self {
        Self {
            pos: Vec2::new(x, OBSTACLE_Y),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Fully left of the visible field
    pub fn is_offscreen(&self) -> bool {
        self.pos.x < -self.size.x
    }
}

/// Complete per-session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub player: Player,
    /// Spawn order; oldest first
    pub obstacles: Vec<Obstacle>,
    pub score: ScoreTracker,
    /// Difficulty applied on the most recent tick
    pub difficulty: u32,
    /// Ticks simulated while running
    pub time_ticks: u64,
    phase: GamePhase,
    events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new session state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            player: Player::default(),
            obstacles: Vec::new(),
            score: ScoreTracker::default(),
            difficulty: MIN_DIFFICULTY,
            time_ticks: 0,
            phase: GamePhase::Ready,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Latch `Ready -> Running`. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);
        true
    }

    /// Latch `Running -> Over`, recording the final score.
    /// Returns false unless the session was running.
    pub fn finish(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Over;
        self.events.push(GameEvent::Collision {
            final_score: self.score.score(),
        });
        true
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
