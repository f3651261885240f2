//! Rate-limit retry policy.
//!
//! The control plane throttles bursty callers with HTTP 429. This module
//! decides whether a throttled attempt is retried and how long to wait
//! before the next one. Every other status is terminal at this layer.

use std::time::Duration;

use crate::config::NimbusConfig;

/// Retry policy for rate-limited requests.
///
/// Only HTTP 429 is retryable. The wait before each retry honors the
/// provider's `Retry-After` hint when one is present; otherwise it follows
/// capped exponential backoff: the base delay doubles per attempt up to the
/// ceiling.
///
/// The attempt budget bounds worst-case call latency: once
/// `max_retries` additional attempts have failed, the call resolves to
/// [`RateLimitError`](crate::RateLimitError) instead of looping.
///
/// # Example
///
/// ```rust
/// use nimbus_api::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_millis(500), Duration::from_secs(8));
///
/// // First throttled attempt: retry after the base delay.
/// assert_eq!(policy.should_retry(1, 429, None), Some(Duration::from_millis(500)));
///
/// // A provider hint always wins.
/// let hint = Some(Duration::from_secs(3));
/// assert_eq!(policy.should_retry(1, 429, hint), Some(Duration::from_secs(3)));
///
/// // Anything that is not a 429 is terminal.
/// assert_eq!(policy.should_retry(1, 500, None), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with an explicit budget and backoff window.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Creates a policy from the client configuration.
    #[must_use]
    pub const fn from_config(config: &NimbusConfig) -> Self {
        Self::new(
            config.max_retries(),
            config.retry_base_delay(),
            config.retry_max_delay(),
        )
    }

    /// Returns the maximum number of additional attempts after the first.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decides whether the attempt that just failed should be retried.
    ///
    /// # Arguments
    ///
    /// * `attempt` - 1-based index of the attempt that just failed
    /// * `status` - the HTTP status that attempt received
    /// * `retry_after` - the provider's `Retry-After` hint, if it sent one
    ///
    /// Returns `Some(wait)` when the request should be retried after
    /// `wait`, or `None` when the failure is terminal (non-429 status, or
    /// the attempt budget is spent).
    #[must_use]
    pub fn should_retry(
        &self,
        attempt: u32,
        status: u16,
        retry_after: Option<Duration>,
    ) -> Option<Duration> {
        if status != 429 || attempt > self.max_retries {
            return None;
        }

        Some(retry_after.unwrap_or_else(|| self.backoff(attempt)))
    }

    /// Capped exponential backoff: `base * 2^(attempt - 1)`, clamped to the
    /// ceiling.
    fn backoff(&self, attempt: u32) -> Duration {
        let doubled = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)));
        doubled.min(self.max_delay)
    }
}
