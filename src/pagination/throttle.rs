//! Minimum spacing between successive page requests.

use std::time::Duration;
use tokio::time::Instant;

// Deadline used when the interval does not fit the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Fixed minimum gap between the starts of two page fetches.
///
/// This bounds the rate at which fetches are issued, not the rate at which
/// they complete, and is applied on top of any backoff delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Minimum time between fetch starts.
    pub min_interval: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(200),
        }
    }
}

impl ThrottlePolicy {
    /// Create a throttle with the given minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// No spacing between fetches.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns true if this policy never delays.
    pub fn is_disabled(&self) -> bool {
        self.min_interval.is_zero()
    }

    /// Earliest instant the next fetch may start, given when the previous
    /// fetch attempt started.
    ///
    /// Intervals too large for the clock saturate to a deadline decades out,
    /// so the next fetch effectively never starts.
    pub fn ready_at(&self, last_start: Instant) -> Instant {
        last_start
            .checked_add(self.min_interval)
            .unwrap_or_else(|| last_start + FAR_FUTURE)
    }
}
