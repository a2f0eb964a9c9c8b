//! # Cart Actor
//!
//! One cart per user (the user id is the unique key). Adding an item looks the menu item
//! up through the restaurant actor, which is injected as this actor's context:
//!
//! ```rust,ignore
//! let (restaurant_actor, restaurants) = restaurant_actor::new(32);
//! let (cart_actor, carts) = cart_actor::new(32);
//! tokio::spawn(restaurant_actor.run(()));
//! tokio::spawn(cart_actor.run(restaurants.clone()));
//! ```
//!
//! A cart only ever holds items of a single restaurant. Adding an item from another
//! restaurant empties the cart first.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::CartClient;
use crate::model::Cart;
use actor_framework::ResourceActor;

/// Creates a new Cart actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Cart>, CartClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CartClient::new(generic_client))
}
