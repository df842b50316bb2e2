//! Wire protocol for the difficulty/score service
//!
//! One JSON object per WebSocket text frame:
//! - server -> client: `{"difficulty": 3}` (extra fields such as `score` are ignored)
//! - client -> server: `{"score": 12}`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MIN_DIFFICULTY;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("difficulty must be a whole number >= 1, got {0}")]
    InvalidDifficulty(f64),
}

/// Server -> client difficulty push
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct DifficultyUpdate {
    difficulty: f64,
}

/// Client -> server score report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u32,
}

/// Extract and validate the difficulty from an inbound frame
pub fn parse_difficulty(text: &str) -> Result<u32, ProtocolError> {
    let update: DifficultyUpdate = serde_json::from_str(text)?;
    let value = update.difficulty;
    let whole = value.is_finite() && value.fract() == 0.0;
    if !whole || value < f64::from(MIN_DIFFICULTY) || value > f64::from(u32::MAX) {
        return Err(ProtocolError::InvalidDifficulty(value));
    }
    Ok(value as u32)
}

/// Encode an outbound score report
pub fn encode_score(score: u32) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(&ScoreReport { score })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_difficulty() {
        assert_eq!(parse_difficulty(r#"{"difficulty": 3}"#).unwrap(), 3);
    }

    #[test]
    fn test_parse_full_player_record() {
        // The reference service echoes the whole player record
        let text = r#"{"score": 27, "difficulty": 5}"#;
        assert_eq!(parse_difficulty(text).unwrap(), 5);
    }

    #[test]
    fn test_parse_whole_float() {
        assert_eq!(parse_difficulty(r#"{"difficulty": 2.0}"#).unwrap(), 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        for text in [
            r#"{"difficulty": 0}"#,
            r#"{"difficulty": -4}"#,
            r#"{"difficulty": 1.5}"#,
            r#"{"difficulty": 1e12}"#,
        ] {
            assert!(
                matches!(
                    parse_difficulty(text),
                    Err(ProtocolError::InvalidDifficulty(_))
                ),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for text in [
            "",
            "not json",
            r#"{"score": 3}"#,
            r#"{"difficulty": "hard"}"#,
            "null",
        ] {
            assert!(
                matches!(parse_difficulty(text), Err(ProtocolError::Malformed(_))),
                "{:?} should be malformed",
                text
            );
        }
    }

    #[test]
    fn test_encode_score() {
        assert_eq!(encode_score(1).unwrap(), r#"{"score":1}"#);
        assert_eq!(encode_score(0).unwrap(), r#"{"score":0}"#);
    }
}
