//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every aggregate (User, Cart, Order, Payment, …)
//! implements to be managed by the generic `ResourceActor`. It names the id, the create and
//! update DTOs, the custom actions, the injected context and the error type, and provides the
//! lifecycle hooks (`on_create`, `on_update`, `on_delete`, `handle_action`).
//!
//! # Provided Methods
//! - [`ActorEntity::on_create`] and [`ActorEntity::on_delete`] default to `Ok(())`.
//! - [`ActorEntity::unique_key`] defaults to `None`. Entities that return a key get the
//!   equivalent of a unique constraint: the actor refuses to store a second entity with the
//!   same key (e.g. one account per email, one cart per user).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are `async` so they can call other actors. The `Context` type is injected into
/// every hook at `run()` time, which lets dependencies (other clients, gateways, senders)
/// be wired after the actor is constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g. `AddItem`, `Cancel`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// One error enum per actor, not per message.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Key that must be unique across the store, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is built and before it is stored.
    /// Failing here aborts the create.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
