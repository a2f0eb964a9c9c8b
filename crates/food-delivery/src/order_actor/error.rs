//! Error types for the Order actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid order state: {0}")]
    InvalidState(String),

    #[error("Order validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for OrderError {
    fn is_transient(&self) -> bool {
        matches!(self, OrderError::ActorCommunicationError(_))
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => ApiError::NotFound(e.to_string()),
            OrderError::InvalidState(msg) => ApiError::InvalidOrderState(msg),
            OrderError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            OrderError::ActorCommunicationError(_) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}
