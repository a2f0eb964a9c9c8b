//! # Saga Log Client
use crate::model::{SagaCreate, SagaId, SagaInstance, SagaStatus};
use crate::saga_actor::{SagaAction, SagaError};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct SagaLogClient {
    inner: ResourceClient<SagaInstance>,
}

impl SagaLogClient {
    pub fn new(inner: ResourceClient<SagaInstance>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn begin(&self, saga_type: &str, context: Value) -> Result<SagaId, SagaError> {
        debug!("Sending request");
        self.inner
            .create(SagaCreate {
                saga_type: saga_type.to_string(),
                context,
            })
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn record(&self, id: SagaId, action: SagaAction) -> Result<SagaInstance, SagaError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    /// Runs that stopped on a failed step and have not been settled.
    #[instrument(skip(self))]
    pub async fn find_failed(&self) -> Result<Vec<SagaInstance>, SagaError> {
        let mut failed = self
            .list(Filter::new(|s: &SagaInstance| s.status == SagaStatus::Failed))
            .await?;
        failed.sort_by_key(|s| s.id);
        Ok(failed)
    }

    /// Operator sign-off for a failed run settled by hand.
    pub async fn mark_compensated(&self, id: SagaId) -> Result<SagaInstance, SagaError> {
        self.record(id, SagaAction::MarkCompensated).await
    }
}

#[async_trait]
impl ActorClient<SagaInstance> for SagaLogClient {
    type Error = SagaError;

    fn inner(&self) -> &ResourceClient<SagaInstance> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<SagaError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => SagaError::NotFound(id),
            Err(other) => SagaError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &SagaId) -> Self::Error {
        SagaError::NotFound(id.to_string())
    }
}
