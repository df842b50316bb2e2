//! Simulation tick
//!
//! Core game loop step: physics, then collision, then scoring.

use super::collision::detect_collision;
use super::physics::{advance_obstacles, cull_obstacles, game_speed, maybe_spawn, update_player};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MIN_DIFFICULTY;

/// Input for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Jump pressed since the previous tick (key or on-screen button)
    pub jump: bool,
    /// Latest difficulty pushed by the service
    pub difficulty: u32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            jump: false,
            difficulty: MIN_DIFFICULTY,
        }
    }
}

/// Result of a jump input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// First input of the session; starts the game without jumping
    Started,
    Jumped,
    /// Airborne or game over
    Ignored,
}

/// Shared semantics for every jump input path
pub fn handle_jump(state: &mut GameState) -> JumpOutcome {
    match state.phase() {
        GamePhase::Ready => {
            state.start();
            JumpOutcome::Started
        }
        GamePhase::Running => {
            if state.player.try_jump() {
                state.push_event(GameEvent::Jumped);
                JumpOutcome::Jumped
            } else {
                JumpOutcome::Ignored
            }
        }
        GamePhase::Over => JumpOutcome::Ignored,
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.jump {
        handle_jump(state);
    }

    // Nothing moves before the first jump or after a collision
    if state.phase() != GamePhase::Running {
        return;
    }

    let difficulty = input.difficulty.max(MIN_DIFFICULTY);
    if difficulty != state.difficulty {
        state.push_event(GameEvent::DifficultyChanged {
            from: state.difficulty,
            to: difficulty,
        });
        state.difficulty = difficulty;
    }

    state.time_ticks += 1;

    update_player(&mut state.player);

    maybe_spawn(&mut state.obstacles, difficulty, &mut state.rng);
    advance_obstacles(&mut state.obstacles, game_speed(difficulty));
    cull_obstacles(&mut state.obstacles);

    if detect_collision(&state.player, &state.obstacles) {
        state.finish();
        return;
    }

    if let Some(score) = state.score.advance() {
        state.push_event(GameEvent::ScoreChanged { score });
    }
}
