//! Wall-clock measurement around a step.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source for timed steps.
///
/// Readings are offsets from an arbitrary, fixed origin. Tests swap in a
/// controllable clock through [`ChainRunner::with_clock`](crate::ChainRunner::with_clock).
pub trait Clock: Send + Sync {
    /// Returns the time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

impl<F> Clock for F
where
    F: Fn() -> Duration + Send + Sync,
{
    fn now(&self) -> Duration {
        self()
    }
}

/// Clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the moment of construction.
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Measures how long a closure takes according to a shared [`Clock`].
#[derive(Clone)]
pub struct Timer {
    clock: Arc<dyn Clock>,
}

impl Timer {
    /// Creates a timer reading from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Runs `f` and returns its value together with the elapsed time.
    ///
    /// A clock that steps backwards yields a zero duration.
    pub fn measure<T>(&self, f: impl FnOnce() -> T) -> (T, Duration) {
        let start = self.clock.now();
        let value = f();
        let elapsed = self.clock.now().saturating_sub(start);
        (value, elapsed)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer").finish_non_exhaustive()
    }
}
