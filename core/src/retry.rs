//! Retry policy and per-call deadlines.
//!
//! # Design
//! Retries are off by default. When enabled, a call is re-sent after a
//! transport failure or a retryable status (429, and 5xx other than 501).
//! The wait before attempt `n` is `1s * 2^n`, replaced by a numeric
//! `Retry-After` header when the server sends one, and never longer than
//! `max_interval`. A `CallContext` deadline caps the whole call, sleeps
//! included.

use std::time::{Duration, Instant};

use crate::http::HttpResponse;

pub const DEFAULT_MAX_RETRIES: u32 = 4;
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);

const BASE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub enabled: bool,
    pub max_retries: u32,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

impl RetryPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_retries: DEFAULT_MAX_RETRIES,
            max_interval: DEFAULT_MAX_RETRY_INTERVAL,
        }
    }

    /// Zero values select the defaults: 4 retries, 30 second cap.
    pub fn enabled(max_retries: u32, max_interval: Duration) -> Self {
        Self {
            enabled: true,
            max_retries: if max_retries == 0 {
                DEFAULT_MAX_RETRIES
            } else {
                max_retries
            },
            max_interval: if max_interval.is_zero() {
                DEFAULT_MAX_RETRY_INTERVAL
            } else {
                max_interval
            },
        }
    }

    /// Total number of attempts a call may make.
    pub fn max_attempts(&self) -> u32 {
        if self.enabled {
            self.max_retries.saturating_add(1)
        } else {
            1
        }
    }

    /// Wait before re-sending after failed attempt number `attempt`
    /// (zero-based).
    pub fn backoff(&self, attempt: u32, response: Option<&HttpResponse>) -> Duration {
        let wait = response
            .and_then(retry_after)
            .unwrap_or_else(|| BASE_INTERVAL.saturating_mul(2u32.saturating_pow(attempt)));
        wait.min(self.max_interval)
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (status >= 500 && status != 501 && status < 600)
}

fn retry_after(response: &HttpResponse) -> Option<Duration> {
    if response.status != 429 && response.status != 503 {
        return None;
    }
    let secs: u64 = response.header("Retry-After")?.trim().parse().ok()?;
    Some(Duration::from_secs(secs))
}

/// Per-call context carrying an optional deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext {
    deadline: Option<Instant>,
}

impl CallContext {
    /// No deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `Some(ZERO)` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|r| r.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, retry_after: Option<&str>) -> HttpResponse {
        HttpResponse {
            status,
            headers: retry_after
                .map(|v| vec![("Retry-After".to_string(), v.to_string())])
                .unwrap_or_default(),
            body: String::new(),
        }
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(501));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(200));
    }

    #[test]
    fn zero_values_select_defaults() {
        let policy = RetryPolicy::enabled(0, Duration::ZERO);
        assert_eq!(policy.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(policy.max_interval, DEFAULT_MAX_RETRY_INTERVAL);
        assert_eq!(policy.max_attempts(), 5);
    }

    #[test]
    fn disabled_makes_one_attempt() {
        assert_eq!(RetryPolicy::disabled().max_attempts(), 1);
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let policy = RetryPolicy::enabled(10, Duration::from_secs(5));
        assert_eq!(policy.backoff(0, None), Duration::from_secs(1));
        assert_eq!(policy.backoff(1, None), Duration::from_secs(2));
        assert_eq!(policy.backoff(2, None), Duration::from_secs(4));
        assert_eq!(policy.backoff(3, None), Duration::from_secs(5));
        assert_eq!(policy.backoff(40, None), Duration::from_secs(5));
    }

    #[test]
    fn retry_after_overrides_backoff() {
        let policy = RetryPolicy::enabled(3, Duration::from_secs(30));
        let resp = response(429, Some("7"));
        assert_eq!(policy.backoff(0, Some(&resp)), Duration::from_secs(7));

        let capped = RetryPolicy::enabled(3, Duration::from_secs(2));
        assert_eq!(capped.backoff(0, Some(&resp)), Duration::from_secs(2));

        // Only honoured for 429 and 503.
        let resp = response(500, Some("7"));
        assert_eq!(policy.backoff(0, Some(&resp)), Duration::from_secs(1));
    }

    #[test]
    fn context_deadline() {
        assert!(CallContext::background().remaining().is_none());
        let ctx = CallContext::with_timeout(Duration::from_secs(60));
        assert!(!ctx.is_expired());
        let past = CallContext::with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(past.is_expired());
        assert_eq!(past.remaining(), Some(Duration::ZERO));
    }
}
