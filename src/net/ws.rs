//! Browser WebSocket shell around [`ChannelState`]
//!
//! Uses `Rc<RefCell>` because WASM is single-threaded. Event handlers hold
//! weak references, so dropping every `DifficultyChannel` handle releases the
//! socket even if `close()` was never called.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use super::ScoreSink;
use super::channel::{ChannelError, ChannelState};
use crate::config::ReconnectConfig;

struct Handlers {
    onopen: Closure<dyn FnMut()>,
    onmessage: Closure<dyn FnMut(MessageEvent)>,
    onerror: Closure<dyn FnMut(ErrorEvent)>,
    onclose: Closure<dyn FnMut(CloseEvent)>,
}

struct Inner {
    url: String,
    state: ChannelState,
    socket: Option<WebSocket>,
    handlers: Option<Handlers>,
    retry_timer: Option<i32>,
    retry_callback: Option<Closure<dyn FnMut()>>,
}

impl Inner {
    fn send(&self, text: &str) -> Result<(), ChannelError> {
        let ws = self
            .socket
            .as_ref()
            .ok_or_else(|| ChannelError::Send("no socket".to_string()))?;
        ws.send_with_str(text)
            .map_err(|e| ChannelError::Send(format!("{e:?}")))
    }

    /// Unhook and close the current socket so it can no longer call back
    fn detach_socket(&mut self) {
        if let Some(ws) = self.socket.take() {
            ws.set_onopen(None);
            ws.set_onmessage(None);
            ws.set_onerror(None);
            ws.set_onclose(None);
            if let Err(e) = ws.close() {
                log::debug!("Socket close failed: {:?}", e);
            }
        }
        self.handlers = None;
    }

    fn cancel_retry(&mut self) {
        if let Some(handle) = self.retry_timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
        self.retry_callback = None;
    }
}

/// Reconnecting difficulty channel for one session
#[derive(Clone)]
pub struct DifficultyChannel {
    inner: Rc<RefCell<Inner>>,
    difficulty: Rc<Cell<u32>>,
}

impl DifficultyChannel {
    /// Create the channel and start connecting to `url`
    pub fn open(url: String, reconnect: ReconnectConfig) -> Self {
        let state = ChannelState::new(reconnect);
        let difficulty = state.difficulty_cell();
        let inner = Rc::new(RefCell::new(Inner {
            url,
            state,
            socket: None,
            handlers: None,
            retry_timer: None,
            retry_callback: None,
        }));
        connect(&inner);
        Self { inner, difficulty }
    }

    /// Shared cell holding the latest difficulty
    pub fn difficulty_cell(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.difficulty)
    }

    /// Close the socket and stop reconnecting. Safe to call repeatedly.
    pub fn close(&self) {
        let mut inner = self.inner.borrow_mut();
        if !inner.state.shutdown() {
            return;
        }
        inner.cancel_retry();
        inner.detach_socket();
        log::info!("Channel to {} closed", inner.url);
    }
}

impl ScoreSink for DifficultyChannel {
    fn report_score(&mut self, score: u32) {
        let mut inner = self.inner.borrow_mut();
        let Some(payload) = inner.state.score_payload(score) else {
            log::debug!("Channel not open, dropping score {}", score);
            return;
        };
        if let Err(e) = inner.send(&payload) {
            log::warn!("{}", e);
        }
    }
}

fn connect(this: &Rc<RefCell<Inner>>) {
    let mut inner = this.borrow_mut();
    if !inner.state.on_connecting() {
        return;
    }
    inner.detach_socket();

    let ws = match WebSocket::new(&inner.url) {
        Ok(ws) => ws,
        Err(e) => {
            let err = ChannelError::Connect {
                url: inner.url.clone(),
                reason: format!("{e:?}"),
            };
            log::error!("{}", err);
            let delay = inner.state.on_close();
            drop(inner);
            if let Some(delay) = delay {
                schedule_retry(this, delay);
            }
            return;
        }
    };
    log::info!("Connecting to {}", inner.url);

    let handlers = Handlers {
        onopen: on_open(Rc::downgrade(this)),
        onmessage: on_message(Rc::downgrade(this)),
        onerror: on_error(Rc::downgrade(this)),
        onclose: on_close(Rc::downgrade(this)),
    };
    ws.set_onopen(Some(handlers.onopen.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(handlers.onmessage.as_ref().unchecked_ref()));
    ws.set_onerror(Some(handlers.onerror.as_ref().unchecked_ref()));
    ws.set_onclose(Some(handlers.onclose.as_ref().unchecked_ref()));

    inner.socket = Some(ws);
    inner.handlers = Some(handlers);
}

fn schedule_retry(this: &Rc<RefCell<Inner>>, delay_ms: u32) {
    let Some(window) = web_sys::window() else {
        log::error!("No window, cannot schedule reconnect");
        return;
    };
    let weak = Rc::downgrade(this);
    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Some(inner) = weak.upgrade() {
            inner.borrow_mut().retry_timer = None;
            connect(&inner);
        }
    });

    let mut inner = this.borrow_mut();
    log::info!(
        "Reconnecting in {} ms (attempt {})",
        delay_ms,
        inner.state.reconnect_attempt()
    );
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        i32::try_from(delay_ms).unwrap_or(i32::MAX),
    ) {
        Ok(handle) => {
            inner.retry_timer = Some(handle);
            inner.retry_callback = Some(callback);
        }
        Err(e) => log::error!("Could not schedule reconnect: {:?}", e),
    }
}

fn on_open(weak: Weak<RefCell<Inner>>) -> Closure<dyn FnMut()> {
    Closure::new(move || {
        let Some(inner) = weak.upgrade() else { return };
        let mut inner = inner.borrow_mut();
        let resync = inner.state.on_open();
        log::info!("Connected to {}", inner.url);
        if let Some(payload) = resync {
            if let Err(e) = inner.send(&payload) {
                log::warn!("{}", e);
            }
        }
    })
}

fn on_message(weak: Weak<RefCell<Inner>>) -> Closure<dyn FnMut(MessageEvent)> {
    Closure::new(move |evt: MessageEvent| {
        let Some(inner) = weak.upgrade() else { return };
        let Some(text) = evt.data().as_string() else {
            log::warn!("Ignoring non-text frame");
            return;
        };
        match inner.borrow_mut().state.on_message(&text) {
            Ok(Some(difficulty)) => log::info!("Difficulty is now {}", difficulty),
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring {:?}: {}", text, e),
        }
    })
}

fn on_error(weak: Weak<RefCell<Inner>>) -> Closure<dyn FnMut(ErrorEvent)> {
    Closure::new(move |_: ErrorEvent| {
        let Some(inner) = weak.upgrade() else { return };
        let mut inner = inner.borrow_mut();
        log::warn!("Socket error on {}", inner.url);
        inner.state.on_error();
    })
}

fn on_close(weak: Weak<RefCell<Inner>>) -> Closure<dyn FnMut(CloseEvent)> {
    Closure::new(move |evt: CloseEvent| {
        let Some(inner) = weak.upgrade() else { return };
        let delay = {
            let mut guard = inner.borrow_mut();
            log::info!(
                "Socket to {} closed (code {}, clean: {})",
                guard.url,
                evt.code(),
                evt.was_clean()
            );
            guard.state.on_close()
        };
        if let Some(delay) = delay {
            schedule_retry(&inner, delay);
        }
    })
}
