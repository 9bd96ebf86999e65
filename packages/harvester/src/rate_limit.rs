//! Fixed-delay pacing for catalog requests.
//!
//! The harvester is strictly sequential, so pacing is a plain sleep before
//! each license detail request. The index request is never throttled.

use std::thread;
use std::time::Duration;

/// Enforces a fixed pause before each license retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Block the calling thread for the configured delay.
    ///
    /// Never fails: pacing is best effort. A zero delay returns immediately.
    pub fn throttle(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Pausing before next request");
        thread::sleep(self.delay);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REQUEST_DELAY)
    }
}
