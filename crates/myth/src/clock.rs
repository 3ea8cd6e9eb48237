//! Wall-clock frame timing.

use std::time::{Duration, Instant};

use tracing::debug;

/// Produces per-frame delta times, clamped so a stall (debugger, window
/// drag) does not turn into one huge simulation step.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
    frame: u64,
}

impl FrameClock {
    /// Starts the clock now.
    #[must_use]
    pub fn new(max_dt: f32) -> Self {
        Self {
            last: Instant::now(),
            max_dt,
            frame: 0,
        }
    }

    /// Seconds since the previous call (or since creation), at most `max_dt`.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        self.frame += 1;
        let dt = clamp_dt(elapsed, self.max_dt);
        if elapsed.as_secs_f32() > self.max_dt {
            debug!(frame = self.frame, elapsed = ?elapsed, "Long frame clamped");
        }
        dt
    }

    /// Frames ticked so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

/// `elapsed` in seconds, capped at `max_dt`.
#[must_use]
pub fn clamp_dt(elapsed: Duration, max_dt: f32) -> f32 {
    elapsed.as_secs_f32().min(max_dt)
}
