//! # Notification Actor
//!
//! Stores every notification and dispatches it on create through the injected
//! [`NotificationSender`]. A notification raised by an event carries the event id;
//! `(event id, template)` is the unique key, so a redelivered event is refused with
//! [`NotificationError::Duplicate`] instead of notifying the user twice.

pub mod actions;
pub mod entity;
pub mod error;
pub mod sender;

pub use actions::*;
pub use error::*;
pub use sender::*;

use crate::clients::NotificationClient;
use crate::model::Notification;
use actor_framework::ResourceActor;

/// Creates a new Notification actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Notification>, NotificationClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, NotificationClient::new(generic_client))
}
