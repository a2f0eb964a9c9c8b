//! Charges and refunds, with `PAYMENT_*` events.

use crate::auth::Principal;
use crate::clients::PaymentClient;
use crate::error::ApiError;
use crate::events::{payment_event, PAYMENT_COMPLETED, PAYMENT_FAILED, PAYMENT_REFUNDED};
use crate::model::{Payment, PaymentCreate, PaymentId, PaymentMethod, PaymentStatus, UserId};
use crate::payment_actor::PaymentError;
use actor_framework::{ActorClient, EventBus};
use tracing::instrument;

#[derive(Clone)]
pub struct PaymentService {
    payments: PaymentClient,
    bus: EventBus,
}

impl PaymentService {
    pub fn new(payments: PaymentClient, bus: EventBus) -> Self {
        Self { payments, bus }
    }

    /// A declined charge is stored as `Failed` and reported as `PaymentProcessing`.
    #[instrument(skip(self))]
    pub async fn charge(
        &self,
        reference: &str,
        user_id: UserId,
        amount: f64,
        method: PaymentMethod,
    ) -> Result<Payment, ApiError> {
        let payment = self
            .payments
            .charge(PaymentCreate {
                reference: reference.to_string(),
                user_id,
                amount,
                method,
            })
            .await?;
        if payment.status == PaymentStatus::Failed {
            self.bus.publish(payment_event(PAYMENT_FAILED, &payment));
            let reason = payment.failure_reason.unwrap_or_else(|| "declined".to_string());
            return Err(PaymentError::Declined(reason).into());
        }
        self.bus.publish(payment_event(PAYMENT_COMPLETED, &payment));
        Ok(payment)
    }

    #[instrument(skip(self))]
    pub async fn refund(&self, payment_id: PaymentId) -> Result<Payment, ApiError> {
        let payment = self.payments.refund(payment_id).await?;
        self.bus.publish(payment_event(PAYMENT_REFUNDED, &payment));
        Ok(payment)
    }

    #[instrument(skip(self, principal))]
    pub async fn get_payment(&self, principal: &Principal, id: PaymentId) -> Result<Payment, ApiError> {
        let payment = self.payments.require(id).await?;
        principal.require_self_or_admin(payment.user_id)?;
        Ok(payment)
    }
}
