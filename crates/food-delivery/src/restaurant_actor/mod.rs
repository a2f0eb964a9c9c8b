//! # Restaurant Actor
//!
//! Restaurants, their menus and opening state. Menu changes are custom actions on the
//! restaurant so the menu is always mutated together with its owner record.
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Restaurant`]
//! - [`error`] - [`RestaurantError`]
//! - [`actions`] - [`RestaurantAction`] for menu management, opening and ratings

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::RestaurantClient;
use crate::model::Restaurant;
use actor_framework::ResourceActor;

/// Creates a new Restaurant actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Restaurant>, RestaurantClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, RestaurantClient::new(generic_client))
}
