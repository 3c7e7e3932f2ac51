//! Clock Module
//!
//! Second-resolution time sources used to stamp and age cache entries.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

// == Clock Trait ==
/// A source of the current Unix time in whole seconds.
pub trait Clock: Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    fn now(&self) -> i64;
}

// == System Clock ==
/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// hand another to the cache.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    pub fn new(start: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start)),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Moves the clock forward by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.now(), 10);

        clock.advance(5);
        assert_eq!(clock.now(), 15);

        clock.set(2);
        assert_eq!(clock.now(), 2);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(0);
        let handle = clock.clone();

        handle.advance(3);
        assert_eq!(clock.now(), 3);
    }

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let before = chrono::Utc::now().timestamp();
        let now = SystemClock.now();
        let after = chrono::Utc::now().timestamp();

        assert!(before <= now && now <= after);
    }
}
