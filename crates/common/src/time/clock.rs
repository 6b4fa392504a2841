//! Wall-clock abstraction
//!
//! Token expiry is compared against [`Clock::now`], so tests can move time
//! forward with `testing::MockClock` instead of sleeping.

use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
