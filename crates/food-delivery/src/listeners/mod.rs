//! Event consumers wired by the platform: each implements
//! [`EventHandler`](actor_framework::EventHandler) and is driven by an
//! [`EventConsumer`](actor_framework::EventConsumer), which retries a failed event and
//! dead-letters it after the last attempt.

pub mod delivery_listener;
pub mod notification_listener;
pub mod order_listener;

pub use delivery_listener::DeliveryListener;
pub use notification_listener::NotificationListener;
pub use order_listener::OrderListener;

use actor_framework::{DomainEvent, HandlerError};

/// Reads a `u32` id out of the payload.
pub(crate) fn id_field(event: &DomainEvent, field: &str) -> Result<u32, HandlerError> {
    let raw = event
        .u64_field(field)
        .ok_or_else(|| format!("{} without {}", event.event_type, field))?;
    Ok(u32::try_from(raw).map_err(|_| format!("{} out of range: {}", field, raw))?)
}
