//! Retry and backoff decisions for failed requests.
//!
//! # Design
//! The policy is consulted by the caller after each failed attempt; nothing
//! retries automatically. Decisions are pure functions of the error and the
//! attempt count. `RetryPolicy::run` is a small blocking driver for callers
//! that want the loop, with the sleep injected so tests never wait.

use std::time::Duration;

use tracing::debug;

use crate::error::ApiError;

/// Backoff parameters. 429 responses use their own, slower curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub rate_limit_base_delay: Duration,
    pub rate_limit_max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(8_000),
            rate_limit_base_delay: Duration::from_millis(1_000),
            rate_limit_max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    pub fn should_retry(&self, error: &ApiError, attempts_so_far: u32) -> bool {
        error.is_retriable() && attempts_so_far < self.max_retries
    }

    /// `min(base * 2^attempt_index, cap)`, saturating for large indices.
    pub fn delay_before_retry(&self, attempt_index: u32, error: &ApiError) -> Duration {
        let (base, cap) = if error.status() == 429 {
            (self.rate_limit_base_delay, self.rate_limit_max_delay)
        } else {
            (self.base_delay, self.max_delay)
        };
        let factor = 1u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
        base.saturating_mul(factor).min(cap)
    }

    /// Run `op` until it succeeds or the policy gives up.
    ///
    /// `op` receives the zero-based attempt number. `sleep` is called with the
    /// backoff delay between attempts.
    pub fn run<T, F, S>(&self, mut op: F, mut sleep: S) -> Result<T, ApiError>
    where
        F: FnMut(u32) -> Result<T, ApiError>,
        S: FnMut(Duration),
    {
        let mut attempts = 0;
        loop {
            match op(attempts) {
                Ok(value) => return Ok(value),
                Err(error) if self.should_retry(&error, attempts) => {
                    let delay = self.delay_before_retry(attempts, &error);
                    debug!(
                        status = error.status(),
                        attempt = attempts,
                        ?delay,
                        "retrying request"
                    );
                    sleep(delay);
                    attempts += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// `should_retry` under the default policy.
pub fn should_retry(error: &ApiError, attempts_so_far: u32) -> bool {
    RetryPolicy::default().should_retry(error, attempts_so_far)
}

/// `delay_before_retry` under the default policy.
pub fn delay_before_retry(attempt_index: u32, error: &ApiError) -> Duration {
    RetryPolicy::default().delay_before_retry(attempt_index, error)
}
