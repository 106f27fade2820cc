//! Host clock and frame-callback boundaries.
//!
//! The core never spins its own timer: the host delivers monotonic time via
//! `Clock` and cooperative per-frame continuations via `FrameScheduler`.
//! Cancellation is synchronous: a handle cancelled before the host grants the
//! frame means that frame is never delivered.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic time source, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock measured from construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Opaque handle for a pending frame continuation.
pub type TickHandle = u64;

/// Cooperative periodic callback boundary (the animation-frame loop of a
/// browser host, a timer wheel elsewhere). The host calls back into
/// `DrumMachine::on_frame` for each granted tick.
pub trait FrameScheduler {
    fn request_tick(&mut self) -> TickHandle;
    fn cancel_tick(&mut self, handle: TickHandle);
}

/// Manually advanced clock for tests and offline rendering.
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
