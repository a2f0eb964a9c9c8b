//! # Saga Log Actor
//!
//! A progress log for multi-step flows such as order placement. Each run is one
//! [`SagaInstance`](crate::model::SagaInstance) with one step execution per step.
//!
//! The log does not drive compensation. A failed run stays `Failed` until an operator
//! settles it by hand with [`SagaAction::BeginCompensation`] and
//! [`SagaAction::MarkCompensated`] (or [`SagaAction::MarkCompensationFailed`]). Step
//! compensators implement [`SagaStep`]; [`compensate`] runs them over a run being
//! compensated and yields one [`SagaAction::RecordCompensation`] per step.

pub mod actions;
pub mod entity;
pub mod error;
pub mod step;

pub use actions::*;
pub use error::*;
pub use step::{compensate, SagaStep, StepError};

use crate::clients::SagaLogClient;
use crate::model::SagaInstance;
use actor_framework::ResourceActor;

/// Creates a new Saga log actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<SagaInstance>, SagaLogClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, SagaLogClient::new(generic_client))
}
