//! [`ActorEntity`] implementation for [`Driver`].

use super::{DriverAction, DriverError};
use crate::model::{Driver, DriverCreate, DriverId, DriverUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Driver {
    type Id = DriverId;
    type Create = DriverCreate;
    type Update = DriverUpdate;
    type Action = DriverAction;
    type ActionResult = Driver;
    type Context = ();
    type Error = DriverError;

    /// Drivers start off shift.
    fn from_create_params(id: DriverId, params: DriverCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(DriverError::ValidationError("name must not be blank".into()));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            name: params.name,
            phone: params.phone,
            vehicle: params.vehicle,
            available: false,
            completed_deliveries: 0,
            created_at: Utc::now(),
        })
    }

    /// One driver profile per account.
    fn unique_key(&self) -> Option<String> {
        Some(self.user_id.to_string())
    }

    async fn on_update(&mut self, update: DriverUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(DriverError::ValidationError("name must not be blank".into()));
            }
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(vehicle) = update.vehicle {
            self.vehicle = vehicle;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: DriverAction, _ctx: &()) -> Result<Driver, Self::Error> {
        match action {
            DriverAction::Claim => {
                if !self.available {
                    return Err(DriverError::Unavailable(self.id.to_string()));
                }
                self.available = false;
            }
            DriverAction::Release { completed } => {
                self.available = true;
                if completed {
                    self.completed_deliveries += 1;
                }
            }
            DriverAction::SetAvailability(available) => self.available = available,
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    #[tokio::test]
    async fn test_claim_and_release() {
        let mut driver = Driver::from_create_params(
            DriverId(1),
            DriverCreate {
                user_id: UserId(3),
                name: "Dana".into(),
                phone: "555-0101".into(),
                vehicle: "bike".into(),
            },
        )
        .unwrap();
        assert!(driver.handle_action(DriverAction::Claim, &()).await.is_err());

        driver.handle_action(DriverAction::SetAvailability(true), &()).await.unwrap();
        let claimed = driver.handle_action(DriverAction::Claim, &()).await.unwrap();
        assert!(!claimed.available);
        assert!(matches!(
            driver.handle_action(DriverAction::Claim, &()).await,
            Err(DriverError::Unavailable(_))
        ));

        let released = driver
            .handle_action(DriverAction::Release { completed: true }, &())
            .await
            .unwrap();
        assert!(released.available);
        assert_eq!(released.completed_deliveries, 1);
    }
}
