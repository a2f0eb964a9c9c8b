//! Error types for the Driver actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DriverError {
    #[error("Driver not found: {0}")]
    NotFound(String),

    #[error("Driver already registered for {0}")]
    AlreadyRegistered(String),

    #[error("Driver is not available: {0}")]
    Unavailable(String),

    #[error("Driver validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for DriverError {
    fn is_transient(&self) -> bool {
        matches!(self, DriverError::ActorCommunicationError(_))
    }
}

impl From<DriverError> for ApiError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::NotFound(_) => ApiError::NotFound(e.to_string()),
            DriverError::AlreadyRegistered(_) => ApiError::Conflict(e.to_string()),
            DriverError::Unavailable(_) | DriverError::ValidationError(_) => {
                ApiError::BadRequest(e.to_string())
            }
            DriverError::ActorCommunicationError(_) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}
