//! Game session
//!
//! Owns one run's state and wires the simulation to its collaborators: the
//! difficulty cell fed by the channel, the score sink, and the renderer. A
//! collision produces exactly one [`GameOverNotice`]; the embedding decides
//! how to surface it and builds a fresh session afterwards.

use std::cell::Cell;
use std::rc::Rc;

use crate::driver::FrameFlow;
use crate::net::ScoreSink;
use crate::render::Renderer;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// End-of-session notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverNotice {
    pub final_score: u32,
    /// How long to wait before showing the notice and resetting
    pub delay_ms: u32,
}

impl GameOverNotice {
    pub fn message(&self) -> String {
        format!("Game Over! Your Score: {}", self.final_score)
    }
}

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The collision frame; returned once per session
    GameOver(GameOverNotice),
    /// Session already ended, nothing ran
    Halted,
}

impl FrameOutcome {
    /// Driver instruction for this outcome
    pub fn flow(&self) -> FrameFlow {
        match self {
            FrameOutcome::Continue => FrameFlow::Continue,
            FrameOutcome::GameOver(_) | FrameOutcome::Halted => FrameFlow::Stop,
        }
    }
}

/// One-shot game-over trigger
#[derive(Debug, Default)]
struct GameOverLatch {
    fired: bool,
}

impl GameOverLatch {
    fn trigger(&mut self, final_score: u32, delay_ms: u32) -> Option<GameOverNotice> {
        if self.fired {
            return None;
        }
        self.fired = true;
        Some(GameOverNotice {
            final_score,
            delay_ms,
        })
    }
}

pub struct Session {
    state: GameState,
    difficulty: Rc<Cell<u32>>,
    reporter: Box<dyn ScoreSink>,
    renderer: Box<dyn Renderer>,
    /// Jump pressed since the last frame
    jump_pressed: bool,
    game_over: GameOverLatch,
    delay_ms: u32,
}

impl Session {
    pub fn new(
        seed: u64,
        difficulty: Rc<Cell<u32>>,
        reporter: Box<dyn ScoreSink>,
        renderer: Box<dyn Renderer>,
        delay_ms: u32,
    ) -> Self {
        log::info!("New session (seed {})", seed);
        Self {
            state: GameState::new(seed),
            difficulty,
            reporter,
            renderer,
            jump_pressed: false,
            game_over: GameOverLatch::default(),
            delay_ms,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Jump action from any input source; applied on the next frame
    pub fn press_jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Run one tick and draw it
    pub fn frame(&mut self) -> FrameOutcome {
        if self.game_over.fired {
            return FrameOutcome::Halted;
        }

        let input = TickInput {
            jump: std::mem::take(&mut self.jump_pressed),
            difficulty: self.difficulty.get(),
        };
        tick(&mut self.state, &input);

        let mut outcome = FrameOutcome::Continue;
        for event in self.state.drain_events() {
            match event {
                GameEvent::Started => log::info!("Game started"),
                GameEvent::Jumped => log::debug!("Jump at tick {}", self.state.time_ticks),
                GameEvent::DifficultyChanged { from, to } => {
                    log::info!("Difficulty {} -> {}", from, to);
                }
                GameEvent::ScoreChanged { score } => self.reporter.report_score(score),
                GameEvent::Collision { final_score } => {
                    log::info!("Game over, final score {}", final_score);
                    if let Some(notice) = self.game_over.trigger(final_score, self.delay_ms) {
                        outcome = FrameOutcome::GameOver(notice);
                    }
                }
            }
        }

        self.renderer.render(&self.state);
        outcome
    }
}
