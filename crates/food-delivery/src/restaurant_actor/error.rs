//! Error types for the Restaurant actor.

use crate::error::ApiError;
use actor_framework::Transient;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RestaurantError {
    #[error("Restaurant not found: {0}")]
    NotFound(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Restaurant validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl Transient for RestaurantError {
    fn is_transient(&self) -> bool {
        matches!(self, RestaurantError::ActorCommunicationError(_))
    }
}

impl From<RestaurantError> for ApiError {
    fn from(e: RestaurantError) -> Self {
        match e {
            RestaurantError::NotFound(_) | RestaurantError::MenuItemNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            RestaurantError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            RestaurantError::ActorCommunicationError(_) => {
                ApiError::ServiceUnavailable(e.to_string())
            }
        }
    }
}
