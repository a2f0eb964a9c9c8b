//! # API Errors
//!
//! One error type for every service operation, with the HTTP status and body a
//! front end would render. Per-actor errors convert into it with `?`.

use actor_framework::{CircuitError, Transient};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidOrderState(String),

    #[error("{message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, String>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PaymentProcessing(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

/// Serialized error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::InvalidOrderState(_) | ApiError::Validation { .. } | ApiError::BadRequest(_) => {
                400
            }
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::Conflict(_) => 409,
            ApiError::PaymentProcessing(_) | ApiError::ServiceUnavailable(_) => 503,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let errors = match self {
            ApiError::Validation { errors, .. } => Some(errors.clone()),
            _ => None,
        };
        ErrorBody {
            status: self.status(),
            message: self.to_string(),
            timestamp: Utc::now(),
            errors,
        }
    }

    /// Fallback for a dependency whose circuit is open.
    pub fn unavailable(service: &str) -> Self {
        ApiError::ServiceUnavailable(format!("{} is unavailable", service))
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("access denied".to_string())
    }
}

impl Transient for ApiError {
    fn is_transient(&self) -> bool {
        matches!(self, ApiError::ServiceUnavailable(_))
    }
}

impl From<CircuitError<ApiError>> for ApiError {
    fn from(e: CircuitError<ApiError>) -> Self {
        e.or_fallback(ApiError::unavailable)
    }
}

/// Collects field errors and turns them into [`ApiError::Validation`].
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless `ok` holds. The first message per field wins.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.0
                .entry(field.to_string())
                .or_insert_with(|| message.to_string());
        }
        self
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation {
                message: "validation failed".to_string(),
                errors: self.0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound("x".into()).status(), 404);
        assert_eq!(ApiError::InvalidOrderState("x".into()).status(), 400);
        assert_eq!(ApiError::Unauthorized("x".into()).status(), 401);
        assert_eq!(ApiError::forbidden().status(), 403);
        assert_eq!(ApiError::Conflict("x".into()).status(), 409);
        assert_eq!(ApiError::PaymentProcessing("x".into()).status(), 503);
        assert_eq!(ApiError::unavailable("payment-service").status(), 503);
        assert_eq!(ApiError::Internal("x".into()).status(), 500);
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let mut errors = FieldErrors::new();
        errors
            .check(false, "email", "must be a valid email")
            .check(false, "email", "ignored")
            .check(true, "name", "must not be blank")
            .check(false, "password", "must be at least 8 characters");
        let err = errors.into_result().unwrap_err();

        let body = err.to_body();
        assert_eq!(body.status, 400);
        let fields = body.errors.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["email"], "must be a valid email");
    }

    #[test]
    fn test_open_circuit_becomes_service_unavailable() {
        let err: ApiError = CircuitError::Open("cart-service".to_string()).into();
        assert_eq!(
            err,
            ApiError::ServiceUnavailable("cart-service is unavailable".into())
        );
        assert!(err.is_transient());
    }

    #[test]
    fn test_body_omits_errors_when_absent() {
        let json = serde_json::to_value(ApiError::NotFound("Order not found".into()).to_body())
            .unwrap();
        assert_eq!(json["status"], 404);
        assert_eq!(json["message"], "Order not found");
        assert!(json.get("errors").is_none());
    }
}
