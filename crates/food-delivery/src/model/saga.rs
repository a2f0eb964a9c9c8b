use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

entity_id!(Saga, "saga");

/// ```text
/// Started ─▶ InProgress ─▶ Completed
///                 │
///                 ▼
///              Failed ─▶ Compensating ─▶ Compensated | CompensationFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SagaStatus {
    Started,
    InProgress,
    Completed,
    Failed,
    Compensating,
    Compensated,
    CompensationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Started,
    Completed,
    Failed,
}

/// Outcome of undoing one completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompensationStatus {
    Pending,
    Compensated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaStepExecution {
    pub step_name: String,
    pub status: StepStatus,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    /// `None` until compensation of the saga begins; only completed steps get one.
    pub compensation: Option<CompensationStatus>,
    pub compensation_error: Option<String>,
    /// Attempts beyond the first.
    pub retry_count: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaInstance {
    pub id: SagaId,
    pub saga_type: String,
    pub status: SagaStatus,
    pub current_step: Option<String>,
    /// Ids gathered along the way (user, cart, payment, order).
    pub context: serde_json::Value,
    pub steps: Vec<SagaStepExecution>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SagaInstance {
    pub fn step(&self, name: &str) -> Option<&SagaStepExecution> {
        self.steps.iter().find(|s| s.step_name == name)
    }

    pub fn failed_step(&self) -> Option<&SagaStepExecution> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    /// Completed steps whose compensation has not been recorded, latest first.
    pub fn pending_compensations(&self) -> impl Iterator<Item = &SagaStepExecution> {
        self.steps
            .iter()
            .rev()
            .filter(|s| s.compensation == Some(CompensationStatus::Pending))
    }
}

#[derive(Debug, Clone)]
pub struct SagaCreate {
    pub saga_type: String,
    pub context: serde_json::Value,
}
