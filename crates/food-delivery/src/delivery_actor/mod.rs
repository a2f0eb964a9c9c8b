//! # Delivery Actor
//!
//! One delivery per order (the order id is the unique key), moving through
//! `Pending → Assigned → PickedUp → Delivered`, or to `Failed` from any open state.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::DeliveryClient;
use crate::model::Delivery;
use actor_framework::ResourceActor;

/// Creates a new Delivery actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Delivery>, DeliveryClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, DeliveryClient::new(generic_client))
}
