//! Exponential backoff with jitter for transient API failures.

use std::time::Duration;

use rand::Rng;

use crate::config::{MAX_RETRIES, RETRY_BASE_DELAY};

/// How often and how long to wait before retrying a transient failure.
///
/// The wait before retry `n` (0-based attempt that just failed) is
/// `base * 2^n + jitter`, with jitter uniform in `[0, base)`. No cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait before the next attempt, jitter drawn from the thread RNG.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base_ms();
        let jitter_ms = if base_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..base_ms)
        };
        self.delay_with_jitter(attempt, jitter_ms)
    }

    /// Deterministic part of [`delay_for`](Self::delay_for): `base * 2^attempt + jitter_ms`.
    pub fn delay_with_jitter(&self, attempt: u32, jitter_ms: u64) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let backoff_ms = self.base_ms().saturating_mul(factor);
        Duration::from_millis(backoff_ms.saturating_add(jitter_ms))
    }

    fn base_ms(&self) -> u64 {
        u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, RETRY_BASE_DELAY)
    }
}
