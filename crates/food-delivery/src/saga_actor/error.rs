//! Error types for the Saga log actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SagaError {
    #[error("Saga not found: {0}")]
    NotFound(String),

    #[error("Invalid saga transition: {0}")]
    InvalidTransition(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for SagaError {
    fn is_transient(&self) -> bool {
        matches!(self, SagaError::ActorCommunicationError(_))
    }
}

impl From<SagaError> for ApiError {
    fn from(e: SagaError) -> Self {
        match e {
            SagaError::NotFound(_) => ApiError::NotFound(e.to_string()),
            SagaError::InvalidTransition(_) => ApiError::BadRequest(e.to_string()),
            SagaError::ActorCommunicationError(_) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}
