//! Custom actions for the Saga log actor.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum SagaAction {
    StartStep(String),
    /// Completes the current step. `retries` counts attempts beyond the first.
    CompleteStep { result: Option<Value>, retries: u32 },
    /// Fails the current step and with it the saga.
    FailStep { error: String, retries: u32 },
    /// Stores a value in the saga context under `key`.
    RecordContext { key: String, value: Value },
    Finish,
    /// Moves a failed saga to `Compensating`; every completed step becomes `Pending`.
    BeginCompensation,
    /// Records how undoing `step` went. `Err` carries the compensator's error.
    RecordCompensation { step: String, outcome: Result<(), String> },
    MarkCompensated,
    MarkCompensationFailed(String),
}
