//! # Food Delivery Platform
//!
//! Users, restaurants, carts, orders, payments, deliveries and notifications, each kept
//! by its own actor and tied together by services and domain events.
//!
//! ## Layers
//!
//! - **[model]**: records and DTOs for every aggregate.
//! - **`*_actor`**: one [`ResourceActor`](actor_framework::ResourceActor) per aggregate,
//!   with its actions, errors and lifecycle hooks.
//! - **[clients]**: typed wrappers over the actors' channels.
//! - **[services]**: the use cases (authorization, caching, retries, circuit breakers,
//!   events). [`auth`] issues and checks tokens.
//! - **[listeners]**: event consumers (notifications, delivery assignment, order
//!   progress).
//! - **[lifecycle]**: [`DeliveryPlatform`](lifecycle::DeliveryPlatform) starts and stops
//!   everything.
//!
//! Errors from any layer end up as [`error::ApiError`]; configuration is read by
//! [`config::AppConfig`].
//!
//! ## Order flow
//!
//! ```text
//! place_order ─► ORDER_CREATED ─► email
//! confirm_order ─► ORDER_CONFIRMED ─► email + push, delivery created, driver assigned
//! mark_picked_up ─► DELIVERY_PICKED_UP ─► order OUT_FOR_DELIVERY
//! mark_delivered ─► DELIVERY_COMPLETED ─► order DELIVERED ─► push
//! ```

pub mod auth;
pub mod cart_actor;
pub mod clients;
pub mod config;
pub mod delivery_actor;
pub mod driver_actor;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod listeners;
pub mod model;
pub mod notification_actor;
pub mod order_actor;
pub mod payment_actor;
pub mod restaurant_actor;
pub mod saga_actor;
pub mod services;
pub mod user_actor;
