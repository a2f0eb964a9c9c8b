//! Error types for the User actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("User validation error: {0}")]
    ValidationError(String),

    #[error("User is deactivated: {0}")]
    Inactive(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for UserError {
    fn is_transient(&self) -> bool {
        matches!(self, UserError::ActorCommunicationError(_))
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => ApiError::NotFound(e.to_string()),
            UserError::EmailTaken(_) => ApiError::Conflict(e.to_string()),
            UserError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            UserError::Inactive(_) => ApiError::Forbidden(e.to_string()),
            UserError::ActorCommunicationError(_) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}
