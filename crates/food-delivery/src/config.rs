//! # Configuration
//!
//! `AppConfig` is read from a TOML file; every section and every field has a default,
//! so an empty file (or no file) gives a working platform.
//!
//! ```toml
//! [logging]
//! filter = "info,food_delivery=debug"
//! json = false
//!
//! [auth]
//! jwt_secret = "change-me"
//! access_token_ttl_secs = 900
//!
//! [resilience.circuit_breaker]
//! failure_rate_threshold = 50.0
//! open_duration_ms = 30000
//! ```
//!
//! `FOOD_DELIVERY_CONFIG` names the file to load and `JWT_SECRET` overrides the signing
//! secret.

use actor_framework::events::DEFAULT_HISTORY_LIMIT;
use actor_framework::{CircuitBreakerConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_PATH_ENV: &str = "FOOD_DELIVERY_CONFIG";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub resilience: ResilienceConfig,
    pub events: EventsConfig,
    pub actors: ActorsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_SECRET.to_string(),
            issuer: "food-delivery".to_string(),
            access_token_ttl_secs: 15 * 60,
            refresh_token_ttl_secs: 7 * 24 * 60 * 60,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub user_profile_ttl_secs: u64,
    pub restaurant_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            user_profile_ttl_secs: 10 * 60,
            restaurant_ttl_secs: 5 * 60,
        }
    }
}

impl CacheConfig {
    pub fn user_profile_ttl(&self) -> Duration {
        Duration::from_secs(self.user_profile_ttl_secs)
    }

    pub fn restaurant_ttl(&self) -> Duration {
        Duration::from_secs(self.restaurant_ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            multiplier: 2.0,
            max_backoff_ms: 2_000,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.initial_backoff_ms))
            .with_multiplier(self.multiplier)
            .with_max_backoff(Duration::from_millis(self.max_backoff_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSettings {
    pub sliding_window_size: usize,
    pub minimum_calls: usize,
    pub failure_rate_threshold: f64,
    pub open_duration_ms: u64,
    pub half_open_calls: u32,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        let defaults = CircuitBreakerConfig::default();
        Self {
            sliding_window_size: defaults.sliding_window_size,
            minimum_calls: defaults.minimum_calls,
            failure_rate_threshold: defaults.failure_rate_threshold,
            open_duration_ms: defaults.open_duration.as_millis() as u64,
            half_open_calls: defaults.half_open_calls,
        }
    }
}

impl BreakerSettings {
    pub fn breaker_config(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            sliding_window_size: self.sliding_window_size,
            minimum_calls: self.minimum_calls,
            failure_rate_threshold: self.failure_rate_threshold,
            open_duration: Duration::from_millis(self.open_duration_ms),
            half_open_calls: self.half_open_calls,
        }
    }
}

/// Applied to the outbound calls of order placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    pub retry: RetrySettings,
    pub circuit_breaker: BreakerSettings,
}

/// Redelivery of events whose handler failed, and how much history the bus keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub consumer_retry: RetrySettings,
    /// Published events the bus retains for inspection.
    pub history_limit: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            consumer_retry: RetrySettings {
                max_attempts: 3,
                initial_backoff_ms: 200,
                multiplier: 2.0,
                max_backoff_ms: 5_000,
            },
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorsConfig {
    pub buffer_size: usize,
}

impl Default for ActorsConfig {
    fn default() -> Self {
        Self { buffer_size: 64 }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// File named by `FOOD_DELIVERY_CONFIG` (defaults otherwise), then environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                info!(%path, "Loading configuration");
                Self::from_file(path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        if config.auth.jwt_secret == DEV_SECRET {
            warn!("Using the development JWT secret; set {}", JWT_SECRET_ENV);
        }
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        };
        if self.auth.jwt_secret.is_empty() {
            return Err(invalid("auth.jwt_secret", "must not be empty"));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(invalid("auth.bcrypt_cost", "must be between 4 and 31"));
        }
        if self.auth.access_token_ttl_secs == 0 {
            return Err(invalid("auth.access_token_ttl_secs", "must be positive"));
        }
        if self.actors.buffer_size == 0 {
            return Err(invalid("actors.buffer_size", "must be positive"));
        }
        let threshold = self.resilience.circuit_breaker.failure_rate_threshold;
        if !(0.0..=100.0).contains(&threshold) || threshold == 0.0 {
            return Err(invalid(
                "resilience.circuit_breaker.failure_rate_threshold",
                "must be in (0, 100]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.resilience.retry.policy().max_attempts, 3);
        assert_eq!(config.actors.buffer_size, 64);
        assert_eq!(config.events.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            json = true

            [auth]
            jwt_secret = "s3cret"
            bcrypt_cost = 4

            [resilience.circuit_breaker]
            open_duration_ms = 500

            [events]
            history_limit = 50
            "#,
        )
        .unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.issuer, "food-delivery");
        assert_eq!(
            config.resilience.circuit_breaker.breaker_config().open_duration,
            Duration::from_millis(500)
        );
        assert_eq!(config.resilience.circuit_breaker.minimum_calls, 5);
        assert_eq!(config.events.history_limit, 50);
        assert_eq!(config.events.consumer_retry.max_attempts, 3);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            AppConfig::from_toml_str("[auth]\nbcrypt_cost = 2"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[actors]\nbuffer_size = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", AuthConfig::default());
        assert!(!rendered.contains(DEV_SECRET));
    }
}
