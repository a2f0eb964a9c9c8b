//! [`ActorEntity`] implementation for [`Delivery`].

use super::{DeliveryAction, DeliveryError};
use crate::model::{Delivery, DeliveryCreate, DeliveryId, DeliveryStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

impl Delivery {
    fn expect_status(&self, expected: DeliveryStatus, what: &str) -> Result<(), DeliveryError> {
        if self.status != expected {
            return Err(DeliveryError::InvalidState(format!(
                "cannot {} delivery {} in status {:?}",
                what, self.id, self.status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Delivery {
    type Id = DeliveryId;
    type Create = DeliveryCreate;
    type Update = ();
    type Action = DeliveryAction;
    type ActionResult = Delivery;
    type Context = ();
    type Error = DeliveryError;

    fn from_create_params(id: DeliveryId, params: DeliveryCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            order_id: params.order_id,
            user_id: params.user_id,
            driver_id: None,
            pickup_address: params.pickup_address,
            dropoff_address: params.dropoff_address,
            status: DeliveryStatus::Pending,
            failure_reason: None,
            assigned_at: None,
            picked_up_at: None,
            delivered_at: None,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.order_id.to_string())
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: DeliveryAction,
        _ctx: &(),
    ) -> Result<Delivery, Self::Error> {
        let now = Utc::now();
        match action {
            DeliveryAction::Assign(driver_id) => {
                self.expect_status(DeliveryStatus::Pending, "assign")?;
                self.driver_id = Some(driver_id);
                self.status = DeliveryStatus::Assigned;
                self.assigned_at = Some(now);
            }
            DeliveryAction::PickUp => {
                self.expect_status(DeliveryStatus::Assigned, "pick up")?;
                self.status = DeliveryStatus::PickedUp;
                self.picked_up_at = Some(now);
            }
            DeliveryAction::Complete => {
                self.expect_status(DeliveryStatus::PickedUp, "complete")?;
                self.status = DeliveryStatus::Delivered;
                self.delivered_at = Some(now);
            }
            DeliveryAction::Fail(reason) => {
                if matches!(self.status, DeliveryStatus::Delivered | DeliveryStatus::Failed) {
                    return Err(DeliveryError::InvalidState(format!(
                        "delivery {} is already closed",
                        self.id
                    )));
                }
                self.status = DeliveryStatus::Failed;
                self.failure_reason = Some(reason);
            }
        }
        info!(delivery = %self.id, order = %self.order_id, status = ?self.status, "Delivery updated");
        Ok(self.clone())
    }
}
