//! # Circuit Breaker
//!
//! A count-based circuit breaker guarding calls to a sibling service.
//!
//! ```text
//!            failure rate >= threshold
//!   Closed ───────────────────────────▶ Open
//!     ▲                                  │ open_duration elapsed
//!     │ all trial calls succeed          ▼
//!     └──────────────────────────── HalfOpen ──── any trial fails ──▶ Open
//! ```
//!
//! Only errors that are [`Transient`] count as failures: a "not found" answer means the
//! dependency is healthy.

use crate::retry::Transient;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBreakerConfig {
    /// Number of most recent calls the failure rate is computed over.
    pub sliding_window_size: usize,
    /// Calls required in the window before the rate is evaluated.
    pub minimum_calls: usize,
    /// Failure percentage (0–100) that opens the circuit.
    pub failure_rate_threshold: f64,
    /// How long the circuit stays open before allowing trial calls.
    pub open_duration: Duration,
    /// Trial calls allowed while half-open.
    pub half_open_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            sliding_window_size: 10,
            minimum_calls: 5,
            failure_rate_threshold: 50.0,
            open_duration: Duration::from_secs(30),
            half_open_calls: 3,
        }
    }
}

/// Externally visible state, for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
enum State {
    Closed,
    Open { until: Instant },
    HalfOpen { started: u32, succeeded: u32 },
}

#[derive(Debug)]
struct Inner {
    state: State,
    window: VecDeque<bool>,
}

/// Error returned by [`CircuitBreaker::call`].
#[derive(Debug)]
pub enum CircuitError<E> {
    /// The call was not attempted.
    Open(String),
    /// The call ran and failed.
    Inner(E),
}

impl<E> CircuitError<E> {
    /// Collapses a rejected call into `fallback()`, keeping real call errors.
    pub fn or_fallback(self, fallback: impl FnOnce(&str) -> E) -> E {
        match self {
            CircuitError::Open(name) => fallback(&name),
            CircuitError::Inner(e) => e,
        }
    }
}

impl<E: fmt::Display> fmt::Display for CircuitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitError::Open(name) => write!(f, "circuit '{}' is open", name),
            CircuitError::Inner(e) => e.fmt(f),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for CircuitError<E> {}

pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: State::Closed,
                window: VecDeque::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the state half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> CircuitState {
        match self.lock().state {
            State::Closed => CircuitState::Closed,
            State::Open { .. } => CircuitState::Open,
            State::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }

    /// Decides whether a call may proceed, moving Open → HalfOpen when the
    /// cooldown has elapsed.
    fn try_acquire(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            State::Closed => true,
            State::Open { until } => {
                if Instant::now() >= until {
                    info!(breaker = %self.name, "Circuit half-open");
                    inner.state = State::HalfOpen {
                        started: 1,
                        succeeded: 0,
                    };
                    true
                } else {
                    false
                }
            }
            State::HalfOpen {
                ref mut started, ..
            } => {
                if *started < self.config.half_open_calls {
                    *started += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn trip(&self, inner: &mut Inner) {
        warn!(breaker = %self.name, open_for = ?self.config.open_duration, "Circuit opened");
        inner.state = State::Open {
            until: Instant::now() + self.config.open_duration,
        };
        inner.window.clear();
    }

    fn record(&self, failed: bool) {
        let mut inner = self.lock();
        match inner.state {
            State::Closed => {
                inner.window.push_back(failed);
                while inner.window.len() > self.config.sliding_window_size {
                    inner.window.pop_front();
                }
                let calls = inner.window.len();
                if calls >= self.config.minimum_calls {
                    let failures = inner.window.iter().filter(|f| **f).count();
                    let rate = failures as f64 * 100.0 / calls as f64;
                    if rate >= self.config.failure_rate_threshold {
                        self.trip(&mut inner);
                    }
                }
            }
            State::HalfOpen {
                ref mut succeeded, ..
            } => {
                if failed {
                    self.trip(&mut inner);
                } else {
                    *succeeded += 1;
                    if *succeeded >= self.config.half_open_calls {
                        info!(breaker = %self.name, "Circuit closed");
                        inner.state = State::Closed;
                        inner.window.clear();
                    }
                }
            }
            // A call admitted before the circuit opened finished late.
            State::Open { .. } => {}
        }
    }

    /// Runs `op` through the breaker.
    pub async fn call<T, E, F, Fut>(&self, op: F) -> Result<T, CircuitError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient,
    {
        if !self.try_acquire() {
            return Err(CircuitError::Open(self.name.clone()));
        }
        let result = op().await;
        let failed = matches!(&result, Err(e) if e.is_transient());
        self.record(failed);
        result.map_err(CircuitError::Inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Upstream {
        Down,
        Missing,
    }

    impl Transient for Upstream {
        fn is_transient(&self) -> bool {
            matches!(self, Upstream::Down)
        }
    }

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(
            "payment-service",
            CircuitBreakerConfig {
                sliding_window_size: 4,
                minimum_calls: 4,
                failure_rate_threshold: 50.0,
                open_duration: Duration::from_secs(10),
                half_open_calls: 2,
            },
        )
    }

    async fn fail(cb: &CircuitBreaker) -> Result<(), CircuitError<Upstream>> {
        cb.call(|| async { Err(Upstream::Down) }).await
    }

    async fn succeed(cb: &CircuitBreaker) -> Result<(), CircuitError<Upstream>> {
        cb.call(|| async { Ok::<(), Upstream>(()) }).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_at_failure_threshold() {
        let cb = breaker();
        succeed(&cb).await.unwrap();
        succeed(&cb).await.unwrap();
        let _ = fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Closed);
        let _ = fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Open);

        let rejected = succeed(&cb).await;
        assert!(matches!(rejected, Err(CircuitError::Open(name)) if name == "payment-service"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_errors_do_not_trip() {
        let cb = breaker();
        for _ in 0..6 {
            let r = cb.call(|| async { Err::<(), _>(Upstream::Missing) }).await;
            assert!(matches!(r, Err(CircuitError::Inner(Upstream::Missing))));
        }
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_closes_after_successful_trials() {
        let cb = breaker();
        for _ in 0..4 {
            let _ = fail(&cb).await;
        }
        assert_eq!(cb.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(11)).await;
        succeed(&cb).await.unwrap();
        assert_eq!(cb.state(), CircuitState::HalfOpen);
        succeed(&cb).await.unwrap();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_failure_reopens() {
        let cb = breaker();
        for _ in 0..4 {
            let _ = fail(&cb).await;
        }
        tokio::time::advance(Duration::from_secs(11)).await;
        let _ = fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[test]
    fn test_or_fallback_maps_rejection() {
        let rejected: CircuitError<String> = CircuitError::Open("cart-service".into());
        assert_eq!(
            rejected.or_fallback(|name| format!("{} unavailable", name)),
            "cart-service unavailable"
        );
    }
}
