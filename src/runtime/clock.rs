//! Clock - Where the gate reads "now" from

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Time is an offset from a fixed origin captured at construction.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    /// Time elapsed since the origin.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Jump to an absolute instant. Never moves backwards.
    pub fn set(&self, instant: Instant) {
        let offset = instant.saturating_duration_since(self.origin);
        if offset > self.offset.get() {
            self.offset.set(offset);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_manual_clock_set_is_monotonic() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.set(start + Duration::from_secs(2));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));

        // Going back is ignored
        clock.set(start + Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }
}
