//! Rate limit bookkeeping
//!
//! A 429 response sets a deadline before which no request is sent.

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use tokio::time::Instant;
use tracing::warn;

/// Delay used when a 429 carries no usable `Retry-After`.
pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_secs(30);

/// Longest delay honoured from `Retry-After`; larger values are clamped.
pub const MAX_THROTTLE_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Throttle deadline shared by every request of one client.
#[derive(Debug, Default)]
pub struct ThrottleGate {
    deadline: Mutex<Option<Instant>>,
}

impl ThrottleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before requests may be sent again, if any.
    pub fn remaining(&self) -> Option<Duration> {
        let deadline = (*self.deadline.lock())?;
        let remaining = deadline.saturating_duration_since(Instant::now());
        (!remaining.is_zero()).then_some(remaining)
    }

    /// Blocks requests for `delay` from now, at most [`MAX_THROTTLE_DELAY`].
    pub fn record(&self, delay: Duration) {
        let delay = delay.min(MAX_THROTTLE_DELAY);
        warn!(delay_secs = delay.as_secs(), "API throttled the client");

        let now = Instant::now();
        *self.deadline.lock() = Some(now.checked_add(delay).unwrap_or(now));
    }
}

/// Delay advertised by `Retry-After`, in seconds, clamped to
/// [`MAX_THROTTLE_DELAY`].
pub fn parse_retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map_or(DEFAULT_THROTTLE_DELAY, |secs| Duration::from_secs(secs).min(MAX_THROTTLE_DELAY))
}
