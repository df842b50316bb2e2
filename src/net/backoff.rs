//! Reconnect delay schedule

use crate::config::ReconnectConfig;

/// Exponential backoff: `initial * multiplier^attempt`, capped at `max`
#[derive(Debug, Clone)]
pub struct Backoff {
    config: ReconnectConfig,
    attempt: u32,
}

impl Backoff {
    pub fn new(config: ReconnectConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Delay for the next attempt, in milliseconds
    pub fn next_delay(&mut self) -> u32 {
        let exponent = i32::try_from(self.attempt).unwrap_or(i32::MAX);
        let raw = f64::from(self.config.initial_delay_ms) * self.config.multiplier.powi(exponent);
        self.attempt = self.attempt.saturating_add(1);
        raw.min(f64::from(self.config.max_delay_ms)) as u32
    }

    /// Number of delays handed out since the last reset
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Start over after a successful connection
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
