//! # Platform Lifecycle
//!
//! [`DeliveryPlatform`] starts every actor, wires the services and event consumers on
//! top of them, and shuts the whole thing down again.
//!
//! ## Wiring
//!
//! Actors are created first and started with their context afterwards, so the order of
//! construction does not matter:
//!
//! | Actor | Context |
//! |-------|---------|
//! | Cart | `RestaurantClient` (menu lookups when adding items) |
//! | Payment | `Arc<dyn PaymentGateway>` |
//! | Notification | `Arc<dyn NotificationSender>` |
//! | everything else | `()` |
//!
//! Consumers subscribe before the platform is handed out, so no event published through
//! a service is missed:
//!
//! | Consumer | Topics | Does |
//! |----------|--------|------|
//! | `notification-service` | user, order, delivery | emails and pushes |
//! | `delivery-service` | order | assigns a driver on `ORDER_CONFIRMED` |
//! | `order-service` | delivery | moves the order on pickup and drop-off |
//!
//! ## Shutdown
//!
//! 1. Close the bus; consumers drain their queues and stop.
//! 2. Drop every service and client, closing the actors' channels.
//! 3. Await the actor tasks.
//!
//! The only context dependency between actors is Cart → Restaurant, which is acyclic, so
//! channel closure is enough to stop everything. Clones of services or clients held
//! outside the platform keep their actors alive; drop them before calling
//! [`DeliveryPlatform::shutdown`].
//!
//! ## Testing
//!
//! [`DeliveryPlatform::with_dependencies`] takes the payment gateway and notification
//! sender, so tests can plug in declining gateways or failing senders.
//! [`DeliveryPlatform::settle`] waits until the consumers have handled everything
//! published so far, including events their handlers publish.

pub mod platform;

pub use platform::*;
