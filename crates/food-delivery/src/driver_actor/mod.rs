//! # Driver Actor
//!
//! Drivers and their availability. Claiming a driver goes through the actor, so two
//! deliveries assigned at the same moment can never get the same driver.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::DriverClient;
use crate::model::Driver;
use actor_framework::ResourceActor;

/// Creates a new Driver actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Driver>, DriverClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, DriverClient::new(generic_client))
}
