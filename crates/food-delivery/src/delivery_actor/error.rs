//! Error types for the Delivery actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryError {
    #[error("Delivery not found: {0}")]
    NotFound(String),

    #[error("Delivery already exists for {0}")]
    AlreadyExists(String),

    #[error("Invalid delivery state: {0}")]
    InvalidState(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for DeliveryError {
    fn is_transient(&self) -> bool {
        matches!(self, DeliveryError::ActorCommunicationError(_))
    }
}

impl From<DeliveryError> for ApiError {
    fn from(e: DeliveryError) -> Self {
        match e {
            DeliveryError::NotFound(_) => ApiError::NotFound(e.to_string()),
            DeliveryError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            DeliveryError::InvalidState(_) => ApiError::BadRequest(e.to_string()),
            DeliveryError::ActorCommunicationError(_) => {
                ApiError::ServiceUnavailable(e.to_string())
            }
        }
    }
}
