//! # Delivery Client
use crate::delivery_actor::{DeliveryAction, DeliveryError};
use crate::model::{Delivery, DeliveryCreate, DeliveryId, OrderId};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct DeliveryClient {
    inner: ResourceClient<Delivery>,
}

impl DeliveryClient {
    pub fn new(inner: ResourceClient<Delivery>) -> Self {
        Self { inner }
    }

    /// Fails with [`DeliveryError::AlreadyExists`] if the order already has one.
    #[instrument(skip(self))]
    pub async fn create_delivery(&self, params: DeliveryCreate) -> Result<DeliveryId, DeliveryError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_for_order(&self, order_id: OrderId) -> Result<Option<Delivery>, DeliveryError> {
        let mut found = self
            .list(Filter::new(move |d: &Delivery| d.order_id == order_id))
            .await?;
        Ok(found.pop())
    }

    #[instrument(skip(self))]
    pub async fn perform(
        &self,
        id: DeliveryId,
        action: DeliveryAction,
    ) -> Result<Delivery, DeliveryError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Delivery> for DeliveryClient {
    type Error = DeliveryError;

    fn inner(&self) -> &ResourceClient<Delivery> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<DeliveryError>() {
            Ok(typed) => typed,
            Err(FrameworkError::Conflict(order)) => DeliveryError::AlreadyExists(order),
            Err(FrameworkError::NotFound(id)) => DeliveryError::NotFound(id),
            Err(other) => DeliveryError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &DeliveryId) -> Self::Error {
        DeliveryError::NotFound(id.to_string())
    }
}
