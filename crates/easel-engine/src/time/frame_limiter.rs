use std::time::{Duration, Instant};

/// Default target rate used when none (or an invalid one) is given.
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Frame timing snapshot handed to the application.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Measured time between the two most recent gate openings, in seconds.
    pub dt: f32,

    /// Measured frame rate (`1 / dt`).
    pub fps: f64,

    /// Monotonic timestamp taken when the frame started.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Fixed-rate frame gate.
///
/// The limiter never sleeps. The caller polls it: once a frame has run, the gate stays
/// closed until at least `1 / frame_rate` seconds have elapsed since that frame
/// started, then re-opens and records the measured interval.
///
/// `run` drives both halves with the wall clock. The runtime uses `begin`/`settle`
/// directly so it can park the event loop until `next_deadline`.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    frame_rate: f64,
    interval: Duration,
    update_due: bool,
    last_update: Instant,
    delta: Duration,
    actual_fps: f64,
    frame_index: u64,
}

impl FrameLimiter {
    /// Creates a limiter targeting `frame_rate` frames per second.
    ///
    /// The first frame is due immediately.
    pub fn new(frame_rate: f64) -> Self {
        Self::starting_at(frame_rate, Instant::now())
    }

    /// Creates a limiter whose clock baseline is `now`.
    pub fn starting_at(frame_rate: f64, now: Instant) -> Self {
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            log::warn!("invalid frame rate {frame_rate}; using {DEFAULT_FRAME_RATE}");
            DEFAULT_FRAME_RATE
        };
        let interval = Duration::from_secs_f64(1.0 / frame_rate);

        Self {
            frame_rate,
            interval,
            update_due: true,
            last_update: now,
            delta: interval,
            actual_fps: frame_rate,
            frame_index: 0,
        }
    }

    /// Runs `frame` if the gate is open, then re-evaluates the gate.
    ///
    /// Returns `false` when `frame` asked to stop. The gate is left open in that case.
    pub fn run<F>(&mut self, frame: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        if self.begin(Instant::now()) {
            if !frame() {
                return false;
            }
            self.finish_frame();
        }

        self.settle(Instant::now());
        true
    }

    /// Starts a frame if one is due, stamping `now` as its start time.
    ///
    /// The gate stays open until [`finish_frame`](Self::finish_frame) is called.
    pub fn begin(&mut self, now: Instant) -> bool {
        if !self.update_due {
            return false;
        }
        self.last_update = now;
        true
    }

    /// Closes the gate after a frame has run.
    pub fn finish_frame(&mut self) {
        self.update_due = false;
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    /// Re-opens the gate once the target interval has elapsed since the last frame start.
    pub fn settle(&mut self, now: Instant) {
        if self.update_due {
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_update);
        if elapsed >= self.interval {
            self.update_due = true;
            self.delta = elapsed;
            self.actual_fps = 1.0 / elapsed.as_secs_f64();
        }
    }

    /// Whether a frame is due.
    #[inline]
    pub fn is_due(&self) -> bool {
        self.update_due
    }

    /// Instant at which the gate re-opens.
    #[inline]
    pub fn next_deadline(&self) -> Instant {
        self.last_update + self.interval
    }

    /// Measured frame rate.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.actual_fps
    }

    /// Measured interval between frame starts, in seconds.
    #[inline]
    pub fn delta_time(&self) -> f64 {
        self.delta.as_secs_f64()
    }

    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of frames completed so far.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Builds the snapshot for the frame that just began.
    pub fn frame_time(&self) -> FrameTime {
        FrameTime {
            dt: self.delta.as_secs_f32(),
            fps: self.actual_fps,
            now: self.last_update,
            frame_index: self.frame_index,
        }
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_frame_is_due_immediately() {
        let t0 = Instant::now();
        let mut limiter = FrameLimiter::starting_at(60.0, t0);
        assert!(limiter.is_due());
        assert!(limiter.begin(t0));
    }

    #[test]
    fn gate_closes_until_interval_elapses() {
        let t0 = Instant::now();
        let mut limiter = FrameLimiter::starting_at(50.0, t0); // 20 ms
        assert!(limiter.begin(t0));
        limiter.finish_frame();

        limiter.settle(t0 + ms(5));
        assert!(!limiter.is_due());
        assert!(!limiter.begin(t0 + ms(5)));

        limiter.settle(t0 + ms(19));
        assert!(!limiter.is_due());

        limiter.settle(t0 + ms(20));
        assert!(limiter.is_due());
    }

    #[test]
    fn unfinished_frame_leaves_gate_open() {
        let t0 = Instant::now();
        let mut limiter = FrameLimiter::starting_at(50.0, t0);
        assert!(limiter.begin(t0));

        limiter.settle(t0 + ms(1));
        assert!(limiter.is_due());
        assert!(limiter.begin(t0 + ms(1)));
        assert_eq!(limiter.frame_index(), 0);
        assert_eq!(limiter.next_deadline(), t0 + ms(21));

        limiter.finish_frame();
        assert_eq!(limiter.frame_index(), 1);
    }

    #[test]
    fn delta_and_fps_are_measured_at_reopen() {
        let t0 = Instant::now();
        let mut limiter = FrameLimiter::starting_at(50.0, t0);
        limiter.begin(t0);
        limiter.finish_frame();
        limiter.settle(t0 + ms(25));

        assert!((limiter.delta_time() - 0.025).abs() < 1e-9);
        assert!((limiter.fps() - 40.0).abs() < 1e-6);
    }

    #[test]
    fn deadline_is_one_interval_after_frame_start() {
        let t0 = Instant::now();
        let mut limiter = FrameLimiter::starting_at(100.0, t0);
        limiter.begin(t0 + ms(3));
        limiter.finish_frame();
        assert_eq!(limiter.next_deadline(), t0 + ms(13));
    }

    #[test]
    fn run_stops_when_frame_returns_false() {
        let mut limiter = FrameLimiter::new(60.0);
        assert!(!limiter.run(|| false));
        // Stopping leaves the gate open and the counter untouched.
        assert!(limiter.is_due());
        assert_eq!(limiter.frame_index(), 0);
    }

    #[test]
    fn run_invokes_frame_at_most_once_per_interval() {
        let mut limiter = FrameLimiter::new(1.0); // 1 s interval
        let mut calls = 0;
        for _ in 0..10 {
            assert!(limiter.run(|| {
                calls += 1;
                true
            }));
        }
        assert_eq!(calls, 1);
        assert_eq!(limiter.frame_index(), 1);
    }

    #[test]
    fn invalid_rate_falls_back_to_default() {
        let limiter = FrameLimiter::new(0.0);
        assert_eq!(limiter.frame_rate(), DEFAULT_FRAME_RATE);
        let limiter = FrameLimiter::new(f64::NAN);
        assert_eq!(limiter.frame_rate(), DEFAULT_FRAME_RATE);
    }
}
