//! Difficulty channel
//!
//! Duplex link to the difficulty/score service. Inbound frames update a
//! shared difficulty cell; score transitions go back out while connected.

pub mod backoff;
pub mod channel;
pub mod protocol;

#[cfg(target_arch = "wasm32")]
mod ws;

pub use backoff::Backoff;
pub use channel::{ChannelError, ChannelState, ConnectionStatus};
pub use protocol::{ProtocolError, ScoreReport, encode_score, parse_difficulty};
#[cfg(target_arch = "wasm32")]
pub use ws::DifficultyChannel;

/// Receives score transitions from a running session
pub trait ScoreSink {
    fn report_score(&mut self, score: u32);
}
