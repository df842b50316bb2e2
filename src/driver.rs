//! Frame driver
//!
//! Runs one simulation step per display refresh. The scheduler is abstract so
//! the browser can plug in `requestAnimationFrame` and tests can step frames
//! by hand.

/// Source of display-refresh callbacks
pub trait FrameScheduler {
    type Handle: Copy;

    /// Request one callback. `None` if the platform refused.
    fn schedule(&mut self) -> Option<Self::Handle>;

    /// Withdraw a request that has not fired yet
    fn cancel(&mut self, handle: Self::Handle);
}

/// What the frame body wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFlow {
    Continue,
    Stop,
}

/// Start/stop lifecycle around a [`FrameScheduler`]
///
/// At most one callback is outstanding at any time, and a frame body runs
/// only for the callback the driver itself requested.
pub struct Driver<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    running: bool,
    frames: u64,
}

impl<S: FrameScheduler> Driver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            running: false,
            frames: 0,
        }
    }

    /// Begin scheduling frames. No-op while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.request();
    }

    /// Cancel any pending frame. No-op while stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames executed since construction
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Deliver a scheduler callback.
    ///
    /// Runs `body` only if this driver is running and had a frame pending,
    /// then requests the next one unless `body` asked to stop. Returns whether
    /// `body` ran.
    pub fn on_frame(&mut self, body: impl FnOnce() -> FrameFlow) -> bool {
        if !self.running || self.pending.take().is_none() {
            return false;
        }
        self.frames += 1;
        match body() {
            FrameFlow::Continue => self.request(),
            FrameFlow::Stop => self.running = false,
        }
        true
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn request(&mut self) {
        match self.scheduler.schedule() {
            Some(handle) => self.pending = Some(handle),
            None => {
                log::error!("Frame scheduler refused a request, stopping");
                self.running = false;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Hands out sequential ids and records cancellations
    #[derive(Default)]
    pub(crate) struct ManualScheduler {
        pub next: u32,
        pub outstanding: Vec<u32>,
        pub cancelled: Vec<u32>,
        pub refuse: bool,
    }

    impl FrameScheduler for ManualScheduler {
        type Handle = u32;

        fn schedule(&mut self) -> Option<u32> {
            if self.refuse {
                return None;
            }
            self.next += 1;
            self.outstanding.push(self.next);
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.outstanding.retain(|&h| h != handle);
            self.cancelled.push(handle);
        }
    }

    impl ManualScheduler {
        /// Fire the oldest outstanding callback, if any
        pub(crate) fn fire(&mut self) -> bool {
            if self.outstanding.is_empty() {
                return false;
            }
            self.outstanding.remove(0);
            true
        }
    }

    /// Fire one callback through the driver
    pub(crate) fn step(
        driver: &mut Driver<ManualScheduler>,
        body: impl FnOnce() -> FrameFlow,
    ) -> bool {
        if !driver.scheduler_mut().fire() {
            return false;
        }
        driver.on_frame(body)
    }

    #[test]
    fn test_runs_one_frame_per_callback() {
        let mut driver = Driver::new(ManualScheduler::default());
        driver.start();
        let mut count = 0;
        for _ in 0..5 {
            assert!(step(&mut driver, || {
                count += 1;
                FrameFlow::Continue
            }));
            assert_eq!(driver.scheduler().outstanding.len(), 1);
        }
        assert_eq!(count, 5);
        assert_eq!(driver.frames(), 5);
    }

    #[test]
    fn test_start_twice_keeps_single_request() {
        let mut driver = Driver::new(ManualScheduler::default());
        driver.start();
        driver.start();
        assert_eq!(driver.scheduler().outstanding, vec![1]);
    }

    #[test]
    fn test_stop_cancels_pending() {
        let mut driver = Driver::new(ManualScheduler::default());
        driver.start();
        driver.stop();
        driver.stop();
        assert!(!driver.is_running());
        assert_eq!(driver.scheduler().cancelled, vec![1]);
        assert!(driver.scheduler().outstanding.is_empty());
    }

    #[test]
    fn test_no_frame_after_stop() {
        let mut driver = Driver::new(ManualScheduler::default());
        driver.start();
        driver.stop();
        // A callback that slipped through still must not run the body
        assert!(!driver.on_frame(|| panic!("Frame ran after stop")));
    }

    #[test]
    fn test_self_cancel() {
        let mut driver = Driver::new(ManualScheduler::default());
        driver.start();
        assert!(step(&mut driver, || FrameFlow::Stop));
        assert!(!driver.is_running());
        assert!(driver.scheduler().outstanding.is_empty());
        assert!(!step(&mut driver, || panic!("Frame ran after self-cancel")));
    }

    #[test]
    fn test_restart_after_stop() {
        let mut driver = Driver::new(ManualScheduler::default());
        driver.start();
        assert!(step(&mut driver, || FrameFlow::Stop));
        driver.start();
        assert!(step(&mut driver, || FrameFlow::Continue));
    }

    #[test]
    fn test_refused_schedule_stops() {
        let mut driver = Driver::new(ManualScheduler {
            refuse: true,
            ..Default::default()
        });
        driver.start();
        assert!(!driver.is_running());
    }
}
