//! Error types for the Notification actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),

    #[error("Notification already sent: {0}")]
    Duplicate(String),

    #[error("Notification validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for NotificationError {
    fn is_transient(&self) -> bool {
        matches!(self, NotificationError::ActorCommunicationError(_))
    }
}

impl From<NotificationError> for ApiError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::NotFound(_) => ApiError::NotFound(e.to_string()),
            NotificationError::Duplicate(_) => ApiError::Conflict(e.to_string()),
            NotificationError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            NotificationError::ActorCommunicationError(_) => {
                ApiError::ServiceUnavailable(e.to_string())
            }
        }
    }
}
