//! Axis-aligned collision detection
//!
//! Every shape in the runner is an upright rectangle, so a strict AABB
//! overlap test is all the game needs. Edges that merely touch do not count.

use glam::Vec2;

use super::state::{Obstacle, Player};

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Index of the first obstacle overlapping the player, if any
pub fn first_collision(player: &Player, obstacles: &[Obstacle]) -> Option<usize> {
    let player_rect = player.rect();
    obstacles
        .iter()
        .position(|obstacle| player_rect.overlaps(&obstacle.rect()))
}

/// Whether the player overlaps any obstacle
pub fn detect_collision(player: &Player, obstacles: &[Obstacle]) -> bool {
    first_collision(player, obstacles).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlapping_rects_collide() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        // Shares the right edge
        assert!(!a.overlaps(&rect(10.0, 0.0, 5.0, 5.0)));
        // Shares the bottom edge
        assert!(!a.overlaps(&rect(0.0, 10.0, 5.0, 5.0)));
        // Shares only a corner
        assert!(!a.overlaps(&rect(10.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_grounded_player_hits_obstacle_in_lane() {
        let player = Player::default();
        let obstacles = vec![Obstacle::at(400.0), Obstacle::at(PLAYER_X + 5.0)];
        assert_eq!(first_collision(&player, &obstacles), Some(1));
        assert!(detect_collision(&player, &obstacles));
    }

    #[test]
    fn test_airborne_player_clears_obstacle() {
        let mut player = Player::default();
        // Bottom edge above obstacle top (175)
        player.pos.y = OBSTACLE_Y - PLAYER_HEIGHT - 1.0;
        assert!(!detect_collision(&player, &[Obstacle::at(PLAYER_X)]));
    }

    #[test]
    fn test_obstacle_just_behind_player_is_clear() {
        let player = Player::default();
        // Right edge at exactly the player's left edge
        let obstacle = Obstacle::at(PLAYER_X - OBSTACLE_WIDTH);
        assert!(!detect_collision(&player, &[obstacle]));
    }

    #[test]
    fn test_empty_field_never_collides() {
        assert!(!detect_collision(&Player::default(), &[]));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -600.0f32..600.0, ay in -300.0f32..300.0,
            aw in 0.5f32..60.0, ah in 0.5f32..60.0,
            bx in -600.0f32..600.0, by in -300.0f32..300.0,
            bw in 0.5f32..60.0, bh in 0.5f32..60.0,
        ) {
            let a = rect(ax, ay, aw, ah);
            let b = rect(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
