//! Demo mode - a simple bot that plays the game
//!
//! Jumps when the nearest obstacle ahead is a few ticks away. Good enough to
//! clear isolated obstacles; tight clusters still end the run.

use super::physics::game_speed;
use super::state::{GamePhase, GameState};
use crate::consts::{PLAYER_WIDTH, PLAYER_X};

/// Ticks of lead time before an obstacle reaches the player
const LEAD_TICKS: f32 = 6.0;

/// Whether the bot presses jump before the next tick
pub fn wants_jump(state: &GameState) -> bool {
    match state.phase() {
        GamePhase::Ready => true,
        GamePhase::Over => false,
        GamePhase::Running => {
            if state.player.jumping {
                return false;
            }
            let front = PLAYER_X + PLAYER_WIDTH;
            let nearest_gap = state
                .obstacles
                .iter()
                .map(|o| o.pos.x - front)
                .filter(|gap| *gap >= 0.0)
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            nearest_gap.is_some_and(|gap| gap <= LEAD_TICKS * game_speed(state.difficulty))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, TickInput, tick};

    #[test]
    fn test_starts_game() {
        let state = GameState::new(1);
        assert!(wants_jump(&state));
    }

    #[test]
    fn test_clears_single_obstacle() {
        let mut state = GameState::new(2);
        let jump = wants_jump(&state);
        tick(&mut state, &TickInput { jump, difficulty: 1 });
        state.obstacles.clear();
        state.obstacles.push(Obstacle::at(300.0));

        let mut jumped = false;
        for _ in 0..120 {
            let jump = wants_jump(&state);
            jumped |= jump;
            tick(&mut state, &TickInput { jump, difficulty: 1 });
            // Keep only the placed obstacle
            state.obstacles.truncate(1);
            assert_eq!(state.phase(), GamePhase::Running);
        }
        assert!(jumped);
    }

    #[test]
    fn test_idle_with_clear_field() {
        let mut state = GameState::new(3);
        state.start();
        assert!(!wants_jump(&state));
        state.obstacles.push(Obstacle::at(PLAYER_X));
        assert!(!wants_jump(&state), "Obstacle already under the player");
    }
}
