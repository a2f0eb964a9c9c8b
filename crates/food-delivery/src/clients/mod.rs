//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).
//!
//! Each client maps framework failures into its actor's error type: the actor's own
//! error is recovered by downcast, a unique-key conflict and a missing id get their
//! domain variants, and anything else (closed or dropped actor) becomes the transient
//! `ActorCommunicationError`.

pub mod cart_client;
pub mod delivery_client;
pub mod driver_client;
pub mod notification_client;
pub mod order_client;
pub mod payment_client;
pub mod restaurant_client;
pub mod saga_client;
pub mod user_client;

pub use cart_client::*;
pub use delivery_client::*;
pub use driver_client::*;
pub use notification_client::*;
pub use order_client::*;
pub use payment_client::*;
pub use restaurant_client::*;
pub use saga_client::*;
pub use user_client::*;
