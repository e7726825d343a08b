use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Controllable monotonic time for timed-step testing.
///
/// Pass [`MockClock::as_clock`] to `ChainRunner::with_clock` and advance the
/// clock from inside step bodies to make elapsed durations exact.
#[derive(Clone)]
pub struct MockClock {
    nanos: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a clock function suitable for passing to ChainRunner.
    pub fn as_clock(&self) -> impl Fn() -> Duration + Send + Sync + 'static {
        let nanos = self.nanos.clone();
        move || Duration::from_nanos(nanos.load(Ordering::SeqCst))
    }
}

impl MockClock {
    /// Create a new mock clock at zero
    pub fn new() -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get current reading
    pub fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    /// Advance time by duration
    pub fn advance(&self, duration: Duration) {
        self.nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Advance time by milliseconds
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Set the reading, possibly backwards
    pub fn set(&self, reading: Duration) {
        self.nanos
            .store(reading.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}
