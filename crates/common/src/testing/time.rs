//! Controllable clock for deterministic tests
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use bleemeo_common::testing::MockClock;
//! use bleemeo_common::time::Clock;
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//!
//! // Simulate one hour passing
//! clock.advance(Duration::from_secs(3600));
//!
//! assert_eq!((clock.now() - start).num_seconds(), 3600);
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::time::Clock;

/// Mock clock that only moves when told to
///
/// Clones share the same elapsed time, so a test can keep one handle and
/// give another to the code under test.
#[derive(Debug, Clone)]
pub struct MockClock {
    base: DateTime<Utc>,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a new mock clock starting at the current real time
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a new mock clock starting at `base`
    #[must_use]
    pub fn starting_at(base: DateTime<Utc>) -> Self {
        Self { base, elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Set the elapsed time since the start, replacing the previous value
    pub fn set_elapsed(&self, elapsed: Duration) {
        *self.elapsed.lock() = elapsed;
    }

    /// Get total elapsed time since the start
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.elapsed()).unwrap_or(chrono::Duration::MAX);
        self.base.checked_add_signed(elapsed).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_mock_clock_advance() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock = MockClock::starting_at(base);

        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), base + chrono::Duration::seconds(90));
        assert_eq!(clock.elapsed(), Duration::from_secs(90));
    }

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::new();
        let handle = clock.clone();

        handle.set_elapsed(Duration::from_secs(10));
        assert_eq!(clock.elapsed(), Duration::from_secs(10));
    }
}
