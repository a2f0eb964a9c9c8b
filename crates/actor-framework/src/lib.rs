//! # Actor Framework
//!
//! Building blocks for services made of in-memory aggregates: every aggregate type
//! (User, Cart, Order, …) lives in its own [`ResourceActor`], is reached through a
//! cloneable [`ResourceClient`], and talks to other services through typed clients and
//! [`events::EventBus`] topics.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain record, its DTOs, actions and hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - sequential message processing over the store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe requests
//!
//! Around those sit the pieces that replace declarative middleware:
//!
//! | Module | Replaces |
//! |--------|----------|
//! | [`retry`] | retry-on-exception annotations |
//! | [`circuit_breaker`] | circuit breaker + fallback annotations |
//! | [`cache`] | cacheable / cache-evict annotations |
//! | [`events`] | broker listeners with retry and dead-letter topics |
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_framework::{ActorEntity, Filter, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Driver { id: u32, name: String, available: bool }
//!
//! #[derive(Debug)] struct DriverCreate { name: String }
//! #[derive(Debug)] struct DriverUpdate { available: Option<bool> }
//! #[derive(Debug)] enum DriverAction {}
//! #[derive(Debug, thiserror::Error)] #[error("driver error")] struct DriverError;
//!
//! #[async_trait]
//! impl ActorEntity for Driver {
//!     type Id = u32;
//!     type Create = DriverCreate;
//!     type Update = DriverUpdate;
//!     type Action = DriverAction;
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = DriverError;
//!
//!     fn from_create_params(id: u32, p: DriverCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, name: p.name, available: true })
//!     }
//!
//!     async fn on_update(&mut self, u: DriverUpdate, _: &()) -> Result<(), Self::Error> {
//!         if let Some(a) = u.available { self.available = a; }
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, a: DriverAction, _: &()) -> Result<(), Self::Error> {
//!         match a {}
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Driver>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(DriverCreate { name: "Dana".into() }).await.unwrap();
//!     client.update(id, DriverUpdate { available: Some(false) }).await.unwrap();
//!
//!     let free = client.query(Filter::new(|d: &Driver| d.available)).await.unwrap();
//!     assert!(free.is_empty());
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are injected when the actor is started, not when it is built, so actors
//! that depend on each other can be constructed in any order:
//!
//! ```rust,ignore
//! let (restaurant_actor, restaurant_client) = ResourceActor::<Restaurant>::new(32);
//! let (cart_actor, cart_client) = ResourceActor::<Cart>::new(32);
//! tokio::spawn(restaurant_actor.run(()));
//! tokio::spawn(cart_actor.run(RestaurantClient::new(restaurant_client)));
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor
//! - Different actors run in parallel
//! - Hooks may await other actors, but never the actor they run in
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from queued expectations instead of a live actor.
//! See the [`mock`] module for patterns.

pub mod actor;
pub mod cache;
pub mod circuit_breaker;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod events;
pub mod message;
pub mod mock;
pub mod retry;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use cache::{CacheAside, CacheStats};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitError, CircuitState};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use events::{DomainEvent, EventBus, EventConsumer, EventHandler, HandlerError, Topic};
pub use message::{Filter, ResourceRequest, Response};
pub use retry::{retry_with_backoff, RetryPolicy, Transient};
