//! # Payment Actor
//!
//! Records every charge attempt. The external processor sits behind the
//! [`PaymentGateway`] trait and is injected as the actor's context, so tests and the
//! demo binary can swap in their own:
//!
//! ```rust,ignore
//! let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway);
//! let (actor, payments) = payment_actor::new(32);
//! tokio::spawn(actor.run(gateway));
//! ```
//!
//! A declined charge is still stored, with status `Failed` and the gateway's reason.
//! A gateway that cannot be reached aborts the create and nothing is stored.

pub mod actions;
pub mod entity;
pub mod error;
pub mod gateway;

pub use actions::*;
pub use error::*;
pub use gateway::*;

use crate::clients::PaymentClient;
use crate::model::Payment;
use actor_framework::ResourceActor;

/// Creates a new Payment actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Payment>, PaymentClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, PaymentClient::new(generic_client))
}
