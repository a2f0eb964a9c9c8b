//! # Payment Client
use crate::model::{Payment, PaymentCreate, PaymentId};
use crate::payment_actor::{PaymentAction, PaymentError};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<Payment>,
}

impl PaymentClient {
    pub fn new(inner: ResourceClient<Payment>) -> Self {
        Self { inner }
    }

    /// Charges and returns the stored payment, which may be `Failed` if declined.
    /// Charging a reference again returns the payment already stored for it.
    #[instrument(skip(self))]
    pub async fn charge(&self, params: PaymentCreate) -> Result<Payment, PaymentError> {
        debug!("Sending request");
        let reference = params.reference.clone();
        match self.inner.create(params).await {
            Ok(id) => self.require(id).await,
            Err(FrameworkError::Conflict(_)) => {
                debug!(%reference, "Reference already charged");
                self.find_by_reference(&reference)
                    .await?
                    .ok_or(PaymentError::AlreadyExists(reference))
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, PaymentError> {
        let reference = reference.to_string();
        let mut payments = self
            .list(Filter::new(move |p: &Payment| p.reference == reference))
            .await?;
        Ok(payments.pop())
    }

    #[instrument(skip(self))]
    pub async fn refund(&self, id: PaymentId) -> Result<Payment, PaymentError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, PaymentAction::Refund)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Payment> for PaymentClient {
    type Error = PaymentError;

    fn inner(&self) -> &ResourceClient<Payment> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<PaymentError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => PaymentError::NotFound(id),
            Err(FrameworkError::Conflict(reference)) => PaymentError::AlreadyExists(reference),
            Err(other) => PaymentError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &PaymentId) -> Self::Error {
        PaymentError::NotFound(id.to_string())
    }
}
