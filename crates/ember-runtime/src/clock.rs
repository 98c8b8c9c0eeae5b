//! Frame clock producing per-frame deltas

use std::time::Instant;

/// Largest delta handed out, so a stalled frame can't fast-forward effects
pub const MAX_FRAME_DELTA: f64 = 0.25;

/// Tracks frame time for the animation driver
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Frames produced so far
    pub frame: u64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance from the wall clock. Call once per frame; the first call yields 0.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            self.frame += 1;
            return 0.0;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed)
    }

    /// Advance by simulated time. Negative input counts as 0.
    pub fn advance(&mut self, elapsed: f64) -> f64 {
        self.delta_time = elapsed.clamp(0.0, MAX_FRAME_DELTA);
        self.total_time += self.delta_time;
        self.frame += 1;
        self.delta_time
    }
}
