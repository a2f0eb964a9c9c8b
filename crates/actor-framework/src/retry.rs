//! # Retry with Exponential Backoff
//!
//! Explicit replacement for a declarative `@Retryable`: wrap a fallible async call,
//! retry it while the error is transient, sleep with exponential backoff between
//! attempts, give up after `max_attempts`.
//!
//! ```rust
//! use actor_framework::retry::{retry_with_backoff, RetryPolicy, Transient};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Timeout;
//! impl std::fmt::Display for Timeout {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("timeout") }
//! }
//! impl Transient for Timeout { fn is_transient(&self) -> bool { true } }
//!
//! # #[tokio::main] async fn main() {
//! let policy = RetryPolicy::new(3, Duration::from_millis(1));
//! let mut calls = 0;
//! let result: Result<u32, Timeout> = retry_with_backoff(&policy, "lookup", || {
//!     calls += 1;
//!     let attempt = calls;
//!     async move { if attempt < 3 { Err(Timeout) } else { Ok(7) } }
//! }).await;
//! assert_eq!(result.unwrap(), 7);
//! # }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Errors that know whether retrying could help.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub initial_backoff: Duration,
    /// Growth factor applied per further failure.
    pub multiplier: f64,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            ..Self::default()
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Delay to sleep after the given failed attempt (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let nanos = self.initial_backoff.as_nanos() as f64 * self.multiplier.powi(exponent);
        let capped = nanos.min(self.max_backoff.as_nanos() as f64);
        Duration::from_nanos(capped.round() as u64)
    }
}

/// Runs `op` until it succeeds, fails with a non-transient error, or the policy
/// runs out of attempts. The last error is returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = policy.backoff_for(attempt);
                warn!(operation, attempt, ?delay, error = %e, "Transient failure, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_transient() {
                    warn!(operation, attempt, error = %e, "Retries exhausted");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum CallError {
        Unavailable,
        Rejected,
    }

    impl Display for CallError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Transient for CallError {
        fn is_transient(&self) -> bool {
            matches!(self, CallError::Unavailable)
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100))
            .with_multiplier(2.0)
            .with_max_backoff(Duration::from_millis(300));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(300));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let counter = calls.clone();
        let result: Result<(), CallError> = retry_with_backoff(&policy, "charge", || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(CallError::Unavailable) }
        })
        .await;

        assert_eq!(result, Err(CallError::Unavailable));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(5, Duration::from_millis(10));

        let counter = calls.clone();
        let result: Result<(), CallError> = retry_with_backoff(&policy, "charge", || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(CallError::Rejected) }
        })
        .await;

        assert_eq!(result, Err(CallError::Rejected));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_later_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(4, Duration::from_millis(10));

        let counter = calls.clone();
        let result = retry_with_backoff(&policy, "lookup", || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(CallError::Unavailable)
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(3));
    }
}
