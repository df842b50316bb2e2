//! Platform-neutral difficulty channel state
//!
//! The socket shell feeds lifecycle and message events in here and acts on
//! what comes back (payloads to send, reconnect delays). Keeping this free of
//! `web_sys` lets the whole lifecycle be tested natively.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use super::backoff::Backoff;
use super::protocol::{ProtocolError, encode_score, parse_difficulty};
use crate::config::ReconnectConfig;
use crate::consts::MIN_DIFFICULTY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("could not open socket to {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("send failed: {0}")]
    Send(String),
}

/// Connection bookkeeping for one session's channel
#[derive(Debug)]
pub struct ChannelState {
    status: ConnectionStatus,
    difficulty: Rc<Cell<u32>>,
    backoff: Backoff,
    last_score: u32,
    shut_down: bool,
}

impl ChannelState {
    pub fn new(reconnect: ReconnectConfig) -> Self {
        Self {
            status: ConnectionStatus::Closed,
            difficulty: Rc::new(Cell::new(MIN_DIFFICULTY)),
            backoff: Backoff::new(reconnect),
            last_score: 0,
            shut_down: false,
        }
    }

    /// Shared cell the simulation reads every tick
    pub fn difficulty_cell(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.difficulty)
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty.get()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// A socket is being created; returns false once shut down
    pub fn on_connecting(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        self.status = ConnectionStatus::Connecting;
        true
    }

    /// Socket opened. Returns the resync payload carrying the current score.
    pub fn on_open(&mut self) -> Option<String> {
        if self.shut_down {
            return None;
        }
        self.status = ConnectionStatus::Open;
        self.backoff.reset();
        match encode_score(self.last_score) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::error!("Could not encode score resync: {}", e);
                None
            }
        }
    }

    /// Inbound frame. `Ok(Some(d))` only when the held difficulty changed.
    pub fn on_message(&mut self, text: &str) -> Result<Option<u32>, ProtocolError> {
        if self.shut_down {
            return Ok(None);
        }
        let difficulty = parse_difficulty(text)?;
        if difficulty == self.difficulty.get() {
            return Ok(None);
        }
        self.difficulty.set(difficulty);
        Ok(Some(difficulty))
    }

    /// Socket error; browsers follow this with a close event
    pub fn on_error(&mut self) {
        if self.status == ConnectionStatus::Open {
            self.status = ConnectionStatus::Closed;
        }
    }

    /// Socket closed. Returns the delay before the next attempt, or `None`
    /// when the channel has been shut down.
    pub fn on_close(&mut self) -> Option<u32> {
        self.status = ConnectionStatus::Closed;
        if self.shut_down {
            return None;
        }
        Some(self.backoff.next_delay())
    }

    /// Record a score transition. Returns the payload to send while open;
    /// otherwise the report is dropped.
    pub fn score_payload(&mut self, score: u32) -> Option<String> {
        self.last_score = score;
        if self.shut_down || self.status != ConnectionStatus::Open {
            return None;
        }
        match encode_score(score) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::error!("Could not encode score {}: {}", score, e);
                None
            }
        }
    }

    /// Stop for good. Returns false if already shut down.
    pub fn shutdown(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        self.shut_down = true;
        self.status = ConnectionStatus::Closed;
        true
    }

    /// Attempts since the last successful open
    pub fn reconnect_attempt(&self) -> u32 {
        self.backoff.attempt()
    }
}
