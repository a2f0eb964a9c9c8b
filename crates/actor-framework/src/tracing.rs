//! # Observability & Tracing
//!
//! Structured logging for every actor, consumer and service in the system.
//!
//! Actors log with an `entity_type` field instead of a module path, so the subscriber
//! hides targets (`with_target(false)`). `RUST_LOG` wins over the configured default:
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=food_delivery=debug,actor_framework=info cargo run
//! ```
//!
//! With `info` an order placement reads:
//!
//! ```text
//! INFO Created entity_type="Payment" id=1 size=1
//! INFO Created entity_type="Order" id=1 size=1
//! INFO Action ok entity_type="Cart" id=1
//! INFO Published topic=order-events event_type="ORDER_CREATED"
//! ```
//!
//! JSON output (one object per line) is meant for log shippers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn setup_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false) // entity_type instead of module paths
                    .compact(),
            )
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Subscriber for tests: captured by the test harness, ignores repeat calls.
pub fn setup_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .with_test_writer()
        .try_init();
}
