//! The seam to the card processor.

use crate::model::{PaymentMethod, UserId};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub reference: String,
    pub user_id: UserId,
    pub amount: f64,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    Approved { transaction_ref: String },
    Declined { reason: String },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> Result<GatewayOutcome, GatewayError>;

    async fn refund(&self, transaction_ref: &str, amount: f64) -> Result<(), GatewayError>;
}

/// Approves every positive, finite amount.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<GatewayOutcome, GatewayError> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Ok(GatewayOutcome::Declined {
                reason: format!("invalid amount {}", request.amount),
            });
        }
        let transaction_ref = format!("txn_{}", Uuid::new_v4().simple());
        info!(reference = %request.reference, amount = request.amount, %transaction_ref, "Simulated charge approved");
        Ok(GatewayOutcome::Approved { transaction_ref })
    }

    async fn refund(&self, transaction_ref: &str, amount: f64) -> Result<(), GatewayError> {
        info!(%transaction_ref, amount, "Simulated refund");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64) -> ChargeRequest {
        ChargeRequest {
            reference: "ref-1".into(),
            user_id: UserId(1),
            amount,
            method: PaymentMethod::CreditCard,
        }
    }

    #[tokio::test]
    async fn test_simulated_gateway_declines_non_positive_amounts() {
        let gateway = SimulatedGateway;
        assert!(matches!(
            gateway.charge(&request(0.0)).await.unwrap(),
            GatewayOutcome::Declined { .. }
        ));
        assert!(matches!(
            gateway.charge(&request(f64::NAN)).await.unwrap(),
            GatewayOutcome::Declined { .. }
        ));
        match gateway.charge(&request(12.5)).await.unwrap() {
            GatewayOutcome::Approved { transaction_ref } => assert!(transaction_ref.starts_with("txn_")),
            other => panic!("expected approval, got {:?}", other),
        }
    }
}
