//! Per-tick kinematics: player gravity and the obstacle conveyor

use rand::Rng;

use super::state::{Obstacle, Player};
use crate::consts::*;

/// Horizontal obstacle speed for a difficulty level (units/tick)
pub fn game_speed(difficulty: u32) -> f32 {
    BASE_SPEED + difficulty as f32
}

/// Chance of spawning an obstacle on a single tick, clamped to [0, 1]
pub fn spawn_probability(difficulty: u32) -> f64 {
    (BASE_SPAWN_RATE * f64::from(difficulty)).clamp(0.0, 1.0)
}

/// Integrate gravity and resolve landing
pub fn update_player(player: &mut Player) {
    player.velocity_y += GRAVITY;
    player.pos.y += player.velocity_y;

    if player.pos.y > GROUND_Y {
        player.pos.y = GROUND_Y;
        player.velocity_y = 0.0;
        player.jumping = false;
    }
}

/// Roll for a new obstacle at the right edge. Returns true if one spawned.
pub fn maybe_spawn<R: Rng>(obstacles: &mut Vec<Obstacle>, difficulty: u32, rng: &mut R) -> bool {
    if rng.random_bool(spawn_probability(difficulty)) {
        obstacles.push(Obstacle::at(FIELD_WIDTH));
        true
    } else {
        false
    }
}

/// Scroll every obstacle left by `speed`
pub fn advance_obstacles(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.pos.x -= speed;
    }
}

/// Drop obstacles that have left the field. Returns how many were removed.
pub fn cull_obstacles(obstacles: &mut Vec<Obstacle>) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| !o.is_offscreen());
    before - obstacles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_jump_trajectory_lands_after_40_ticks() {
        let mut player = Player::default();
        assert!(player.try_jump());

        for tick in 1..40 {
            update_player(&mut player);
            assert!(player.jumping, "Still airborne at tick {}", tick);
        }
        // Apex-symmetric: back at the ground line one tick before landing
        assert_eq!(player.pos.y, GROUND_Y);

        update_player(&mut player);
        assert_eq!(player.pos.y, GROUND_Y);
        assert_eq!(player.velocity_y, 0.0);
        assert!(!player.jumping);
    }

    #[test]
    fn test_jump_apex() {
        let mut player = Player::default();
        player.try_jump();
        let mut min_y = player.pos.y;
        for _ in 0..40 {
            update_player(&mut player);
            min_y = min_y.min(player.pos.y);
        }
        // Rises 9.5 + 9.0 + ... + 0.5 before gravity turns it around
        assert_eq!(min_y, GROUND_Y - 95.0);
    }

    #[test]
    fn test_spawn_and_cull_after_129_ticks() {
        let speed = game_speed(1);
        assert_eq!(speed, 4.0);

        let mut obstacles = vec![Obstacle::at(FIELD_WIDTH)];
        for tick in 1..=128 {
            advance_obstacles(&mut obstacles, speed);
            assert_eq!(cull_obstacles(&mut obstacles), 0, "Culled early at {}", tick);
        }
        advance_obstacles(&mut obstacles, speed);
        assert_eq!(cull_obstacles(&mut obstacles), 1);
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_cull_keeps_spawn_order() {
        let mut obstacles = vec![
            Obstacle::at(-100.0),
            Obstacle::at(20.0),
            Obstacle::at(-16.0),
            Obstacle::at(300.0),
        ];
        assert_eq!(cull_obstacles(&mut obstacles), 2);
        let xs: Vec<f32> = obstacles.iter().map(|o| o.pos.x).collect();
        assert_eq!(xs, vec![20.0, 300.0]);
    }

    #[test]
    fn test_spawn_probability_clamped() {
        assert!((spawn_probability(1) - 0.015).abs() < 1e-12);
        assert!((spawn_probability(10) - 0.15).abs() < 1e-12);
        assert_eq!(spawn_probability(1000), 1.0);
    }

    #[test]
    fn test_certain_spawn_appends_at_right_edge() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut obstacles = Vec::new();
        // Probability saturates at 1.0
        assert!(maybe_spawn(&mut obstacles, 100, &mut rng));
        assert_eq!(obstacles, vec![Obstacle::at(FIELD_WIDTH)]);
    }

    #[test]
    fn test_spawn_rate_tracks_difficulty() {
        let count = |difficulty: u32| {
            let mut rng = Pcg32::seed_from_u64(42);
            let mut obstacles = Vec::new();
            for _ in 0..10_000 {
                maybe_spawn(&mut obstacles, difficulty, &mut rng);
            }
            obstacles.len()
        };
        let easy = count(1);
        let hard = count(5);
        // Expected 150 vs 750
        assert!((100..200).contains(&easy), "easy spawned {}", easy);
        assert!((650..850).contains(&hard), "hard spawned {}", hard);
    }

    proptest! {
        #[test]
        fn prop_landing_is_idempotent(extra_ticks in 1usize..200, jump in any::<bool>()) {
            let mut player = Player::default();
            if jump {
                player.try_jump();
            }
            // Long enough for any jump to land
            for _ in 0..41 {
                update_player(&mut player);
            }
            for _ in 0..extra_ticks {
                update_player(&mut player);
                prop_assert_eq!(player.pos.y, GROUND_Y);
                prop_assert_eq!(player.velocity_y, 0.0);
                prop_assert!(!player.jumping);
            }
        }
    }
}
