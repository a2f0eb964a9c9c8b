//! [`ActorEntity`] implementation for [`Payment`].

use super::{ChargeRequest, GatewayError, GatewayOutcome, PaymentAction, PaymentError, PaymentGateway};
use crate::model::{round_cents, Payment, PaymentCreate, PaymentId, PaymentStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

impl From<GatewayError> for PaymentError {
    fn from(e: GatewayError) -> Self {
        PaymentError::GatewayUnavailable(e.to_string())
    }
}

#[async_trait]
impl ActorEntity for Payment {
    type Id = PaymentId;
    type Create = PaymentCreate;
    /// Payments are never edited; state only moves through the gateway.
    type Update = ();
    type Action = PaymentAction;
    type ActionResult = Payment;
    type Context = Arc<dyn PaymentGateway>;
    type Error = PaymentError;

    fn from_create_params(id: PaymentId, params: PaymentCreate) -> Result<Self, Self::Error> {
        let now = Utc::now();
        let amount = if params.amount.is_finite() {
            round_cents(params.amount)
        } else {
            params.amount
        };
        Ok(Self {
            id,
            reference: params.reference,
            user_id: params.user_id,
            amount,
            method: params.method,
            status: PaymentStatus::Pending,
            transaction_ref: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// One payment per reference, so a retried charge never reaches the gateway twice.
    fn unique_key(&self) -> Option<String> {
        Some(self.reference.clone())
    }

    /// Charges through the gateway. A decline is recorded, an unreachable gateway is not.
    async fn on_create(&mut self, gateway: &Arc<dyn PaymentGateway>) -> Result<(), Self::Error> {
        let request = ChargeRequest {
            reference: self.reference.clone(),
            user_id: self.user_id,
            amount: self.amount,
            method: self.method,
        };
        match gateway.charge(&request).await? {
            GatewayOutcome::Approved { transaction_ref } => {
                info!(payment = %self.id, %transaction_ref, "Payment completed");
                self.status = PaymentStatus::Completed;
                self.transaction_ref = Some(transaction_ref);
            }
            GatewayOutcome::Declined { reason } => {
                warn!(payment = %self.id, %reason, "Payment declined");
                self.status = PaymentStatus::Failed;
                self.failure_reason = Some(reason);
            }
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &Arc<dyn PaymentGateway>) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: PaymentAction,
        gateway: &Arc<dyn PaymentGateway>,
    ) -> Result<Payment, Self::Error> {
        match action {
            PaymentAction::Refund => {
                let transaction_ref = match (&self.status, &self.transaction_ref) {
                    (PaymentStatus::Completed, Some(t)) => t.clone(),
                    _ => {
                        return Err(PaymentError::InvalidState(format!(
                            "payment {} is {:?} and cannot be refunded",
                            self.id, self.status
                        )))
                    }
                };
                gateway.refund(&transaction_ref, self.amount).await?;
                info!(payment = %self.id, amount = self.amount, "Payment refunded");
                self.status = PaymentStatus::Refunded;
                self.updated_at = Utc::now();
            }
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentMethod, UserId};
    use crate::payment_actor::SimulatedGateway;

    struct Offline;

    #[async_trait]
    impl PaymentGateway for Offline {
        async fn charge(&self, _: &ChargeRequest) -> Result<GatewayOutcome, GatewayError> {
            Err(GatewayError::Unreachable("connection refused".into()))
        }
        async fn refund(&self, _: &str, _: f64) -> Result<(), GatewayError> {
            Err(GatewayError::Unreachable("connection refused".into()))
        }
    }

    fn payment(amount: f64) -> Payment {
        Payment::from_create_params(
            PaymentId(1),
            PaymentCreate {
                reference: "ref-1".into(),
                user_id: UserId(1),
                amount,
                method: PaymentMethod::DebitCard,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_approved_charge_can_be_refunded_once() {
        let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway);
        let mut p = payment(20.0);
        p.on_create(&gateway).await.unwrap();
        assert_eq!(p.status, PaymentStatus::Completed);
        assert!(p.transaction_ref.is_some());

        let refunded = p.handle_action(PaymentAction::Refund, &gateway).await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);
        let err = p.handle_action(PaymentAction::Refund, &gateway).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_decline_is_recorded_as_failed() {
        let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway);
        let mut p = payment(-5.0);
        p.on_create(&gateway).await.unwrap();
        assert_eq!(p.status, PaymentStatus::Failed);
        assert!(p.failure_reason.is_some());
        assert!(p.handle_action(PaymentAction::Refund, &gateway).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transient() {
        let gateway: Arc<dyn PaymentGateway> = Arc::new(Offline);
        let mut p = payment(10.0);
        let err = p.on_create(&gateway).await.unwrap_err();
        assert!(matches!(err, PaymentError::GatewayUnavailable(_)));
        assert!(actor_framework::Transient::is_transient(&err));
    }
}
