//! Elapsed-time sources
//!
//! A [`Timer`] reports the seconds elapsed since it was last reset. The
//! dynamic environment handlers poll it to decide when to iterate phases.
//!
//! - [`ChronoTimer`]: wall-clock implementation backed by [`Instant`]
//! - [`FakeTimer`]: manually driven time source for tests and replays

use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Monotonic elapsed-time source.
///
/// Both operations take `&self` so a timer can be shared between a handler
/// and the loop that drives it.
pub trait Timer: Send + Sync + std::fmt::Debug {
    /// Sets the reference instant to now.
    fn reset(&self);

    /// Returns the seconds elapsed since the last reset (or construction).
    fn elapsed(&self) -> f64;
}

/// Available timer implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerType {
    /// Wall-clock timer, see [`ChronoTimer`].
    #[default]
    Chrono,
}

/// Creates a timer of the requested type.
#[must_use]
pub fn create_timer(timer_type: TimerType) -> Arc<dyn Timer> {
    match timer_type {
        TimerType::Chrono => Arc::new(ChronoTimer::new()),
    }
}

// ============================================================================
// ChronoTimer
// ============================================================================

/// Wall-clock timer with millisecond resolution.
#[derive(Debug)]
pub struct ChronoTimer {
    start: Mutex<Instant>,
}

impl ChronoTimer {
    /// Creates a timer whose reference instant is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Mutex::new(Instant::now()),
        }
    }
}

impl Default for ChronoTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for ChronoTimer {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    fn reset(&self) {
        let mut start = self.start.lock().expect("timer lock poisoned");
        *start = Instant::now();
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::cast_precision_loss)]
    fn elapsed(&self) -> f64 {
        let start = *self.start.lock().expect("timer lock poisoned");
        start.elapsed().as_millis() as f64 / 1000.0
    }
}

// ============================================================================
// FakeTimer
// ============================================================================

/// Timer whose elapsed time only moves when told to.
///
/// `reset()` brings the elapsed time back to zero.
#[derive(Debug, Default)]
pub struct FakeTimer {
    now: Mutex<f64>,
}

impl FakeTimer {
    /// Creates a fake timer at `0.0` seconds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the elapsed time, in seconds.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set(&self, seconds: f64) {
        *self.now.lock().expect("fake timer lock poisoned") = seconds;
    }

    /// Moves the elapsed time forward by `seconds`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn advance(&self, seconds: f64) {
        *self.now.lock().expect("fake timer lock poisoned") += seconds;
    }
}

impl Timer for FakeTimer {
    fn reset(&self) {
        self.set(0.0);
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    fn elapsed(&self) -> f64 {
        *self.now.lock().expect("fake timer lock poisoned")
    }
}
