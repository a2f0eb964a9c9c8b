//! # Driver Client
use crate::driver_actor::{DriverAction, DriverError};
use crate::model::{Driver, DriverCreate, DriverId, DriverUpdate};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct DriverClient {
    inner: ResourceClient<Driver>,
}

impl DriverClient {
    pub fn new(inner: ResourceClient<Driver>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn register(&self, params: DriverCreate) -> Result<DriverId, DriverError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_driver(&self, id: DriverId, update: DriverUpdate) -> Result<Driver, DriverError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Available drivers, lowest id first.
    #[instrument(skip(self))]
    pub async fn available(&self) -> Result<Vec<Driver>, DriverError> {
        let mut drivers = self.list(Filter::new(|d: &Driver| d.available)).await?;
        drivers.sort_by_key(|d| d.id);
        Ok(drivers)
    }

    #[instrument(skip(self))]
    pub async fn perform(&self, id: DriverId, action: DriverAction) -> Result<Driver, DriverError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Driver> for DriverClient {
    type Error = DriverError;

    fn inner(&self) -> &ResourceClient<Driver> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<DriverError>() {
            Ok(typed) => typed,
            Err(FrameworkError::Conflict(user)) => DriverError::AlreadyRegistered(user),
            Err(FrameworkError::NotFound(id)) => DriverError::NotFound(id),
            Err(other) => DriverError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &DriverId) -> Self::Error {
        DriverError::NotFound(id.to_string())
    }
}
