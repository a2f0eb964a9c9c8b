//! Error types for the Payment actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment not found: {0}")]
    NotFound(String),

    #[error("Payment already exists for reference {0}")]
    AlreadyExists(String),

    #[error("Invalid payment state: {0}")]
    InvalidState(String),

    #[error("Payment declined: {0}")]
    Declined(String),

    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for PaymentError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            PaymentError::GatewayUnavailable(_) | PaymentError::ActorCommunicationError(_)
        )
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::NotFound(_) => ApiError::NotFound(e.to_string()),
            PaymentError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            PaymentError::InvalidState(_) => ApiError::BadRequest(e.to_string()),
            PaymentError::Declined(_) => ApiError::PaymentProcessing(e.to_string()),
            PaymentError::GatewayUnavailable(_) | PaymentError::ActorCommunicationError(_) => {
                ApiError::ServiceUnavailable(e.to_string())
            }
        }
    }
}
