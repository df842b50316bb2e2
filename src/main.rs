//! AI Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, Window};

    use ai_runner::input::{JUMP_BUTTON_ID, is_jump_key};
    use ai_runner::net::DifficultyChannel;
    use ai_runner::render::CanvasRenderer;
    use ai_runner::{Driver, FrameOutcome, FrameScheduler, GameOverNotice, RunnerConfig, Session};

    const CANVAS_ID: &str = "game-canvas";

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` with one reusable callback
    struct RafScheduler {
        window: Window,
        callback: FrameCallback,
    }

    impl FrameScheduler for RafScheduler {
        type Handle = i32;

        fn schedule(&mut self) -> Option<i32> {
            let callback = self.callback.borrow();
            let callback = callback.as_ref()?;
            match self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
            {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    None
                }
            }
        }

        fn cancel(&mut self, handle: i32) {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }

    /// Page-lifetime state; sessions come and go inside it
    struct App {
        config: RunnerConfig,
        window: Window,
        document: Document,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        driver: Driver<RafScheduler>,
        session: Session,
        channel: DifficultyChannel,
    }

    impl App {
        fn new_session(&self) -> (Session, DifficultyChannel) {
            new_session(&self.config, &self.document, &self.canvas, &self.ctx)
        }

        /// Drop the finished session and start a fresh one
        fn restart(&mut self) {
            self.driver.stop();
            self.channel.close();
            let (session, channel) = self.new_session();
            self.session = session;
            self.channel = channel;
            self.driver.start();
        }
    }

    fn new_session(
        config: &RunnerConfig,
        document: &Document,
        canvas: &HtmlCanvasElement,
        ctx: &CanvasRenderingContext2d,
    ) -> (Session, DifficultyChannel) {
        let channel = DifficultyChannel::open(config.endpoint(), config.reconnect.clone());
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let session = Session::new(
            seed,
            channel.difficulty_cell(),
            Box::new(channel.clone()),
            Box::new(CanvasRenderer::new(document, canvas, ctx.clone())),
            config.game_over_delay_ms,
        );
        (session, channel)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("AI Runner starting...");

        let config = RunnerConfig::load();
        let window = web_sys::window().expect("No window");
        let document = window.document().expect("No document");
        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .expect("No canvas element")
            .dyn_into::<HtmlCanvasElement>()
            .expect("Not a canvas");
        let ctx = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("No 2d context")
            .dyn_into::<CanvasRenderingContext2d>()
            .expect("Not a 2d context");

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler {
            window: window.clone(),
            callback: Rc::clone(&callback),
        };
        let (session, channel) = new_session(&config, &document, &canvas, &ctx);
        let app = Rc::new(RefCell::new(App {
            config,
            window,
            document,
            canvas,
            ctx,
            driver: Driver::new(scheduler),
            session,
            channel,
        }));

        // The frame callback only holds a weak handle so the slot can own it
        let weak = Rc::downgrade(&app);
        *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
            if let Some(app) = weak.upgrade() {
                game_loop(&app);
            }
        }));

        setup_input_handlers(&app);
        app.borrow_mut().driver.start();

        log::info!("AI Runner running!");
    }

    fn game_loop(app: &Rc<RefCell<App>>) {
        let mut notice = None;
        {
            let mut guard = app.borrow_mut();
            let App {
                driver, session, ..
            } = &mut *guard;
            driver.on_frame(|| {
                let outcome = session.frame();
                if let FrameOutcome::GameOver(n) = outcome {
                    notice = Some(n);
                }
                outcome.flow()
            });
        }

        if let Some(notice) = notice {
            schedule_game_over(app, notice);
        }
    }

    fn schedule_game_over(app: &Rc<RefCell<App>>, notice: GameOverNotice) {
        let window = app.borrow().window.clone();
        let app = Rc::clone(app);
        let callback = Closure::once_into_js(move || {
            let window = app.borrow().window.clone();
            if let Err(e) = window.alert_with_message(&notice.message()) {
                log::warn!("alert failed: {:?}", e);
            }
            app.borrow_mut().restart();
        });
        let delay = i32::try_from(notice.delay_ms).unwrap_or(i32::MAX);
        if let Err(e) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            log::error!("Could not schedule game over: {:?}", e);
        }
    }

    fn setup_input_handlers(app: &Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();

        // Keyboard
        {
            let app = Rc::clone(app);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if is_jump_key(&event.code()) {
                    event.prevent_default();
                    app.borrow_mut().session.press_jump();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen jump button
        if let Some(btn) = document.get_element_by_id(JUMP_BUTTON_ID) {
            let app = Rc::clone(app);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().session.press_jump();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::info!("No #{} element, keyboard only", JUMP_BUTTON_ID);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use ai_runner::net::{ChannelState, ScoreReport, ScoreSink};
    use ai_runner::render::NullRenderer;
    use ai_runner::sim::wants_jump;
    use ai_runner::{FrameOutcome, RunnerConfig, Session};

    /// Frames after which a run is stopped even if the bot is still alive
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// In-process stand-in for the difficulty service: raises difficulty
    /// by one for every five points scored
    struct LoopbackService {
        channel: Rc<RefCell<ChannelState>>,
    }

    impl LoopbackService {
        /// Open the channel and hand the on-open resync to the service
        fn connect(&self) {
            let resync = {
                let mut channel = self.channel.borrow_mut();
                channel.on_connecting();
                channel.on_open()
            };
            if let Some(payload) = resync {
                self.receive(&payload);
            }
        }

        /// Service side: read a score report and push back a difficulty
        fn receive(&self, payload: &str) {
            let report: ScoreReport = match serde_json::from_str(payload) {
                Ok(report) => report,
                Err(e) => {
                    log::warn!("Service could not read {:?}: {}", payload, e);
                    return;
                }
            };
            log::debug!("Service received score {}", report.score);
            let reply = serde_json::json!({ "score": report.score, "difficulty": 1 + report.score / 5 });
            match self.channel.borrow_mut().on_message(&reply.to_string()) {
                Ok(Some(difficulty)) => log::info!("Difficulty is now {}", difficulty),
                Ok(None) => {}
                Err(e) => log::warn!("Ignoring {}: {}", reply, e),
            }
        }
    }

    impl ScoreSink for LoopbackService {
        fn report_score(&mut self, score: u32) {
            let payload = self.channel.borrow_mut().score_payload(score);
            if let Some(payload) = payload {
                self.receive(&payload);
            }
        }
    }

    pub fn run() {
        let config = RunnerConfig::load();
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

        let channel = Rc::new(RefCell::new(ChannelState::new(config.reconnect.clone())));
        let service = LoopbackService {
            channel: Rc::clone(&channel),
        };
        service.connect();
        let difficulty = channel.borrow().difficulty_cell();
        let mut session = Session::new(
            seed,
            difficulty,
            Box::new(service),
            Box::new(NullRenderer),
            config.game_over_delay_ms,
        );

        let mut frames = 0u64;
        let final_score = loop {
            if wants_jump(session.state()) {
                session.press_jump();
            }
            frames += 1;
            match session.frame() {
                FrameOutcome::Continue if frames < MAX_FRAMES => {}
                FrameOutcome::Continue => {
                    log::info!("Stopping after {} frames", frames);
                    break session.state().score.score();
                }
                FrameOutcome::GameOver(notice) => {
                    log::info!("{}", notice.message());
                    break notice.final_score;
                }
                FrameOutcome::Halted => break session.state().score.score(),
            }
        };

        channel.borrow_mut().shutdown();
        log::info!(
            "Run finished: seed {}, {} frames, score {}, difficulty {}",
            seed,
            frames,
            final_score,
            session.state().difficulty
        );
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("AI Runner (headless) starting...");
    log::info!("The browser build runs with `trunk serve`; this runs the bot against a local stand-in service");
    headless::run();
}
