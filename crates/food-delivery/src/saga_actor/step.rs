//! Forward and compensating actions of a saga step.
//!
//! Order placement runs its steps inline and only logs them, so nothing executes a
//! [`SagaStep`] during placement. [`compensate`] is what settles a failed run once an
//! operator has begun its compensation.

use super::SagaAction;
use crate::model::SagaInstance;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

pub type StepError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Matches [`SagaStepExecution::step_name`](crate::model::SagaStepExecution::step_name).
    fn name(&self) -> &str;

    /// Forward action. The returned value is stored as the step's result.
    async fn execute(&self, context: &Value) -> Result<Value, StepError>;

    /// Undoes a completed step, given the result its forward action produced.
    async fn compensate(&self, context: &Value, result: Option<&Value>) -> Result<(), StepError>;
}

/// Runs the compensator of every pending step of `saga`, latest step first, and returns
/// the actions recording each outcome. Steps with no matching compensator are skipped.
pub async fn compensate(saga: &SagaInstance, steps: &[&dyn SagaStep]) -> Vec<SagaAction> {
    let mut actions = Vec::new();
    for execution in saga.pending_compensations() {
        let Some(step) = steps.iter().find(|s| s.name() == execution.step_name) else {
            debug!(saga = %saga.id, step = %execution.step_name, "No compensator, skipping");
            continue;
        };
        let outcome = step
            .compensate(&saga.context, execution.result.as_ref())
            .await
            .map_err(|e| e.to_string());
        actions.push(SagaAction::RecordCompensation {
            step: execution.step_name.clone(),
            outcome,
        });
    }
    actions
}
