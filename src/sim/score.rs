//! Time-based scoring
//!
//! Score grows with ticks survived, not obstacles cleared.

use crate::consts::TICKS_PER_POINT;

/// Counts running ticks and reports when the derived score changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTracker {
    ticks: u64,
    score: u32,
    ticks_per_point: u64,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new(TICKS_PER_POINT)
    }
}

impl ScoreTracker {
    pub fn new(ticks_per_point: u64) -> Self {
        Self {
            ticks: 0,
            score: 0,
            ticks_per_point: ticks_per_point.max(1),
        }
    }

    /// Count one tick. Returns the new score on a transition, `None` otherwise.
    pub fn advance(&mut self) -> Option<u32> {
        self.ticks += 1;
        let derived = u32::try_from(self.ticks / self.ticks_per_point).unwrap_or(u32::MAX);
        if derived == self.score {
            return None;
        }
        self.score = derived;
        Some(derived)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_only_on_boundary() {
        let mut tracker = ScoreTracker::new(50);
        for tick in 1..=99 {
            let transition = tracker.advance();
            if tick == 50 {
                assert_eq!(transition, Some(1), "Tick 50 crosses into score 1");
            } else {
                assert_eq!(transition, None, "Tick {} must not report", tick);
            }
        }
        assert_eq!(tracker.advance(), Some(2));
        assert_eq!(tracker.ticks(), 100);
    }

    #[test]
    fn test_zero_ticks_per_point_is_clamped() {
        let mut tracker = ScoreTracker::new(0);
        assert_eq!(tracker.advance(), Some(1));
        assert_eq!(tracker.advance(), Some(2));
    }
}
