//! Error types for the Cart actor.

use crate::error::ApiError;
use crate::restaurant_actor::RestaurantError;
use actor_framework::Transient;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),

    #[error("Cart already exists for {0}")]
    AlreadyExists(String),

    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Restaurant is closed: {0}")]
    RestaurantClosed(String),

    #[error("Menu item is unavailable: {0}")]
    ItemUnavailable(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<RestaurantError> for CartError {
    fn from(e: RestaurantError) -> Self {
        match e {
            RestaurantError::NotFound(id) => CartError::RestaurantNotFound(id),
            RestaurantError::MenuItemNotFound(id) => CartError::MenuItemNotFound(id),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl Transient for CartError {
    fn is_transient(&self) -> bool {
        matches!(self, CartError::ActorCommunicationError(_))
    }
}

impl From<CartError> for ApiError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::NotFound(_)
            | CartError::ItemNotInCart(_)
            | CartError::RestaurantNotFound(_)
            | CartError::MenuItemNotFound(_) => ApiError::NotFound(e.to_string()),
            CartError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            CartError::RestaurantClosed(_)
            | CartError::ItemUnavailable(_)
            | CartError::InvalidQuantity(_) => ApiError::BadRequest(e.to_string()),
            CartError::ActorCommunicationError(_) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}
