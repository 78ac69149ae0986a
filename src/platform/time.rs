//! Time source for the game loop
//!
//! The scheduler only needs a monotonic "now", a timed sleep and a yield,
//! so those sit behind a trait and tests drive the loop with a manual clock.

use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Monotonic time since the clock was created
    fn now(&self) -> Duration;

    /// Block for roughly `duration`. May return early; callers measure.
    fn sleep(&self, duration: Duration);

    /// Let other threads run
    fn yield_now(&self);
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    // Parked so `LoopControl::stop` can wake the loop early
    fn sleep(&self, duration: Duration) {
        thread::park_timeout(duration);
    }

    fn yield_now(&self) {
        thread::yield_now();
    }
}
