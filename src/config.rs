//! Runtime configuration
//!
//! Tuning constants live in [`crate::consts`]; this covers what differs
//! between deployments. On the web the config is read from an optional
//! `<script id="runner-config" type="application/json">` block, and a
//! `?player=` query parameter overrides the player id.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::GAME_OVER_DELAY_MS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("server_url must be a ws:// or wss:// URL, got {0:?}")]
    InvalidServerUrl(String),
    #[error("player_id must be non-empty ASCII letters, digits, '-' or '_', got {0:?}")]
    InvalidPlayerId(String),
    #[error("reconnect policy invalid: {0}")]
    InvalidReconnect(&'static str),
}

/// Exponential backoff policy for the difficulty channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Delay before the first reconnect attempt
    pub initial_delay_ms: u32,
    /// Upper bound for any single delay
    pub max_delay_ms: u32,
    /// Growth factor per failed attempt
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
            multiplier: 2.0,
        }
    }
}

/// Deployment settings for a runner client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Service base URL; the player id is appended as the last path segment
    pub server_url: String,
    pub player_id: String,
    pub reconnect: ReconnectConfig,
    /// Pause between collision and the end-of-session notice
    pub game_over_delay_ms: u32,
    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            server_url: "wss://ai-runner-game.onrender.com/game".to_string(),
            player_id: "player1".to_string(),
            reconnect: ReconnectConfig::default(),
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            seed: None,
        }
    }
}

impl RunnerConfig {
    /// Id of the DOM element holding the JSON config
    pub const ELEMENT_ID: &'static str = "runner-config";
    /// Environment variable naming a JSON config file (native)
    pub const ENV_VAR: &'static str = "AI_RUNNER_CONFIG";

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server_url.trim();
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::InvalidServerUrl(self.server_url.clone()));
        }
        if !is_valid_player_id(&self.player_id) {
            return Err(ConfigError::InvalidPlayerId(self.player_id.clone()));
        }
        let reconnect = &self.reconnect;
        if reconnect.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidReconnect("initial_delay_ms must be > 0"));
        }
        if reconnect.max_delay_ms < reconnect.initial_delay_ms {
            return Err(ConfigError::InvalidReconnect(
                "max_delay_ms must be >= initial_delay_ms",
            ));
        }
        if !reconnect.multiplier.is_finite() || reconnect.multiplier < 1.0 {
            return Err(ConfigError::InvalidReconnect("multiplier must be >= 1.0"));
        }
        Ok(())
    }

    /// Full channel URL for this player
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.server_url.trim().trim_end_matches('/'),
            self.player_id
        )
    }

    /// Load config from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let json = window
            .as_ref()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        let mut config = match json {
            Some(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from #{}", Self::ELEMENT_ID);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring page config: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default config");
                Self::default()
            }
        };

        let player = window
            .and_then(|w| w.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("player"));
        if let Some(player) = player {
            if is_valid_player_id(&player) {
                config.player_id = player;
            } else {
                log::warn!("Ignoring invalid player id {:?} from URL", player);
            }
        }

        config
    }

    /// Load config from the file named by `AI_RUNNER_CONFIG`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default config");
            return Self::default();
        };
        let loaded = std::fs::read_to_string(&path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                Self::default()
            }
        }
    }
}

fn is_valid_player_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
