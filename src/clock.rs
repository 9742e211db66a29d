//! Page-time clocks
//!
//! Every deadline in the crate is a [`Duration`] measured from page load
//! ("page time"). State machines never read a clock themselves: drivers
//! read one and pass `now` in, which keeps the machines testable without
//! real timers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Source of the current page time.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Manually advanced clock for tests and virtual-time simulation.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock at page time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.millis.fetch_add(as_millis(delta), Ordering::SeqCst);
    }

    /// Sets the clock to an absolute page time.
    ///
    /// Moving backwards is ignored; page time is monotonic.
    pub fn set(&self, at: Duration) {
        self.millis.fetch_max(as_millis(at), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Clock backed by tokio's time source.
///
/// Honours paused tokio time, so `tokio::time::advance` in tests moves it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    /// Creates a clock whose origin is the current tokio instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }

    /// Converts a page-time deadline back into a tokio instant.
    #[must_use]
    pub fn instant_at(&self, at: Duration) -> tokio::time::Instant {
        self.origin + at
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Saturating conversion to whole milliseconds.
#[must_use]
pub fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        assert_eq!(ManualClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(250));
        clock.advance(Duration::from_millis(750));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let a = ManualClock::new();
        let b = a.clone();
        a.advance(Duration::from_millis(10));
        assert_eq!(b.now(), Duration::from_millis(10));
    }

    #[test]
    fn test_manual_clock_set_is_monotonic() {
        let clock = ManualClock::new();
        clock.set(Duration::from_millis(500));
        clock.set(Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::start();
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(clock.now(), Duration::from_millis(1500));
        assert_eq!(
            clock.instant_at(Duration::from_millis(1500)),
            tokio::time::Instant::now()
        );
    }

    #[test]
    fn test_as_millis_saturates() {
        assert_eq!(as_millis(Duration::from_millis(42)), 42);
        assert_eq!(as_millis(Duration::MAX), u64::MAX);
    }
}
