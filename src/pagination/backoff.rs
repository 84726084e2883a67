//! Backoff policy for page fetches rejected by rate limiting.

use super::TransientError;
use rand::Rng;
use std::time::Duration;

/// Exponential backoff applied to transient page-fetch failures.
///
/// `max_attempts` counts every fetch issued for one continuation token,
/// including the first, so a policy with `max_attempts = 5` retries at most
/// four times before the last error is surfaced unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Growth factor applied per retry.
    pub multiplier: f64,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Total attempts allowed for one page, including the first.
    pub max_attempts: u32,
    /// Randomize each delay within `[delay / 2, delay]`.
    pub jitter: bool,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_secs(20),
            max_attempts: 5,
            jitter: true,
        }
    }
}

impl BackoffPolicy {
    /// Create a policy allowing `max_attempts` attempts per page.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Set the delay before the first retry.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the growth factor.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay to wait before retry number `attempt + 1` (zero-based).
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let cap = self.max_delay.as_nanos() as f64;
        let raw = self.initial_delay.as_nanos() as f64
            * self.multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let capped = if raw.is_finite() { raw.min(cap) } else { cap }.max(0.0);

        let nanos = if self.jitter && capped > 0.0 {
            capped * rand::thread_rng().gen_range(0.5..=1.0)
        } else {
            capped
        };

        Duration::from_nanos(nanos as u64)
    }

    /// Whether a fetch that failed with `error` after `attempts_made`
    /// attempts should be issued again.
    pub fn should_retry<E: TransientError>(&self, attempts_made: u32, error: &E) -> bool {
        attempts_made < self.max_attempts && error.is_transient()
    }
}
