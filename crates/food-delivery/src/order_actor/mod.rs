//! # Order Actor
//!
//! Stores placed orders and owns their state machine. The actor enforces every
//! transition itself, so two concurrent cancellations or a cancel racing a confirm
//! cannot both succeed:
//!
//! ```text
//! Pending ──confirm──▶ Confirmed ──▶ Preparing ──▶ ReadyForPickup ──▶ OutForDelivery ──▶ Delivered
//!    │
//!    └──cancel──▶ Cancelled
//! ```
//!
//! Orders are created by the order service after payment succeeds; the actor only
//! checks that the order has items and computes its total.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use actor_framework::ResourceActor;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
