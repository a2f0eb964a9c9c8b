//! [`ActorEntity`] implementation for [`SagaInstance`].

use super::{SagaAction, SagaError};
use crate::model::{
    CompensationStatus, SagaCreate, SagaId, SagaInstance, SagaStatus, SagaStepExecution, StepStatus,
};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{info, warn};

impl SagaInstance {
    fn invalid(&self, what: &str) -> SagaError {
        SagaError::InvalidTransition(format!(
            "cannot {} saga {} in status {:?}",
            what, self.id, self.status
        ))
    }

    fn running_step(&mut self) -> Result<&mut SagaStepExecution, SagaError> {
        let id = self.id;
        self.steps
            .last_mut()
            .filter(|s| s.status == StepStatus::Started)
            .ok_or_else(|| SagaError::InvalidTransition(format!("saga {} has no running step", id)))
    }

    fn is_running(&self) -> bool {
        matches!(self.status, SagaStatus::Started | SagaStatus::InProgress)
    }
}

#[async_trait]
impl ActorEntity for SagaInstance {
    type Id = SagaId;
    type Create = SagaCreate;
    type Update = ();
    type Action = SagaAction;
    type ActionResult = SagaInstance;
    type Context = ();
    type Error = SagaError;

    fn from_create_params(id: SagaId, params: SagaCreate) -> Result<Self, Self::Error> {
        let context = match params.context {
            Value::Null => Value::Object(Map::new()),
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(SagaError::InvalidTransition(format!(
                    "saga context must be an object, got {}",
                    other
                )))
            }
        };
        let now = Utc::now();
        Ok(Self {
            id,
            saga_type: params.saga_type,
            status: SagaStatus::Started,
            current_step: None,
            context,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(&mut self, action: SagaAction, _ctx: &()) -> Result<SagaInstance, Self::Error> {
        let now = Utc::now();
        match action {
            SagaAction::StartStep(name) => {
                if !self.is_running() {
                    return Err(self.invalid("start a step of"));
                }
                if self.running_step().is_ok() {
                    return Err(self.invalid("start a second concurrent step of"));
                }
                self.steps.push(SagaStepExecution {
                    step_name: name.clone(),
                    status: StepStatus::Started,
                    result: None,
                    error: None,
                    compensation: None,
                    compensation_error: None,
                    retry_count: 0,
                    started_at: now,
                    finished_at: None,
                });
                self.current_step = Some(name);
                self.status = SagaStatus::InProgress;
            }
            SagaAction::CompleteStep { result, retries } => {
                let step = self.running_step()?;
                step.status = StepStatus::Completed;
                step.result = result;
                step.retry_count = retries;
                step.finished_at = Some(now);
            }
            SagaAction::FailStep { error, retries } => {
                let step = self.running_step()?;
                step.status = StepStatus::Failed;
                step.error = Some(error.clone());
                step.retry_count = retries;
                step.finished_at = Some(now);
                warn!(saga = %self.id, step = ?self.current_step, %error, "Saga step failed");
                self.status = SagaStatus::Failed;
            }
            SagaAction::RecordContext { key, value } => {
                if let Value::Object(map) = &mut self.context {
                    map.insert(key, value);
                }
            }
            SagaAction::Finish => {
                if !self.is_running() || self.running_step().is_ok() {
                    return Err(self.invalid("finish"));
                }
                self.status = SagaStatus::Completed;
                self.current_step = None;
                info!(saga = %self.id, saga_type = %self.saga_type, "Saga completed");
            }
            SagaAction::BeginCompensation => {
                if self.status != SagaStatus::Failed {
                    return Err(self.invalid("compensate"));
                }
                for step in self.steps.iter_mut().filter(|s| s.status == StepStatus::Completed) {
                    step.compensation = Some(CompensationStatus::Pending);
                }
                self.status = SagaStatus::Compensating;
            }
            SagaAction::RecordCompensation { step, outcome } => {
                if self.status != SagaStatus::Compensating {
                    return Err(self.invalid("record compensation of"));
                }
                let id = self.id;
                let execution = self
                    .steps
                    .iter_mut()
                    .find(|s| s.step_name == step && s.compensation == Some(CompensationStatus::Pending))
                    .ok_or_else(|| {
                        SagaError::InvalidTransition(format!(
                            "saga {} has no step {} awaiting compensation",
                            id, step
                        ))
                    })?;
                match outcome {
                    Ok(()) => execution.compensation = Some(CompensationStatus::Compensated),
                    Err(error) => {
                        warn!(saga = %id, %step, %error, "Step compensation failed");
                        execution.compensation = Some(CompensationStatus::Failed);
                        execution.compensation_error = Some(error);
                    }
                }
            }
            SagaAction::MarkCompensated => {
                if !matches!(self.status, SagaStatus::Failed | SagaStatus::Compensating) {
                    return Err(self.invalid("mark compensated"));
                }
                info!(saga = %self.id, "Saga compensated");
                self.status = SagaStatus::Compensated;
            }
            SagaAction::MarkCompensationFailed(reason) => {
                if self.status != SagaStatus::Compensating {
                    return Err(self.invalid("fail compensation of"));
                }
                warn!(saga = %self.id, %reason, "Saga compensation failed");
                self.status = SagaStatus::CompensationFailed;
            }
        }
        self.updated_at = now;
        Ok(self.clone())
    }
}
