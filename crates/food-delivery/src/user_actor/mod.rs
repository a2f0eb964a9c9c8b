//! # User Actor
//!
//! Account records: registration data, profile fields, role and active flag.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`User`]
//! - [`error`] - [`UserError`]
//! - [`actions`] - [`UserAction`] (deactivate, reactivate, change role)
//! - [`new()`] - Factory function that creates the actor and client
//!
//! The normalized email is the entity's unique key: creating a second account with the
//! same address fails with a conflict, which the client reports as
//! [`UserError::EmailTaken`].
//!
//! ```rust
//! use food_delivery::model::{Role, UserCreate};
//! use food_delivery::user_actor;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = user_actor::new(8);
//!     tokio::spawn(actor.run(()));
//!
//!     let params = UserCreate {
//!         name: "Alice".into(),
//!         email: "alice@example.com".into(),
//!         password_hash: "$2b$04$...".into(),
//!         phone: None,
//!         address: None,
//!         role: Role::Customer,
//!     };
//!     client.create_user(params.clone()).await.unwrap();
//!     assert!(client.create_user(params).await.is_err());
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::UserClient;
use crate::model::User;
use actor_framework::ResourceActor;

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, UserClient::new(generic_client))
}
