//! Drivers and deliveries.

use crate::auth::Principal;
use crate::clients::{DeliveryClient, DriverClient};
use crate::delivery_actor::{DeliveryAction, DeliveryError};
use crate::driver_actor::{DriverAction, DriverError};
use crate::error::ApiError;
use crate::events::{delivery_event, DELIVERY_ASSIGNED, DELIVERY_COMPLETED, DELIVERY_PICKED_UP};
use crate::model::{
    Delivery, DeliveryCreate, DeliveryId, DeliveryStatus, Driver, DriverCreate, DriverId, OrderId,
    Role, UserId,
};
use actor_framework::{ActorClient, EventBus};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct DeliveryService {
    deliveries: DeliveryClient,
    drivers: DriverClient,
    bus: EventBus,
}

impl DeliveryService {
    pub fn new(deliveries: DeliveryClient, drivers: DriverClient, bus: EventBus) -> Self {
        Self {
            deliveries,
            drivers,
            bus,
        }
    }

    /// A driver registers themselves; an admin may register on behalf of any account.
    #[instrument(skip(self, principal))]
    pub async fn register_driver(
        &self,
        principal: &Principal,
        mut params: DriverCreate,
    ) -> Result<Driver, ApiError> {
        principal.require_any_role(&[Role::Driver, Role::Admin])?;
        if !principal.is_admin() {
            params.user_id = principal.user_id;
        }
        let id = self.drivers.register(params).await?;
        let driver = self.drivers.require(id).await?;
        info!(driver = %id, user = %driver.user_id, "Driver registered");
        Ok(driver)
    }

    async fn own_driver(&self, principal: &Principal, id: DriverId) -> Result<Driver, ApiError> {
        let driver = self.drivers.require(id).await?;
        principal.require_self_or_admin(driver.user_id)?;
        Ok(driver)
    }

    /// Going on or off shift.
    #[instrument(skip(self, principal))]
    pub async fn set_availability(
        &self,
        principal: &Principal,
        id: DriverId,
        available: bool,
    ) -> Result<Driver, ApiError> {
        self.own_driver(principal, id).await?;
        let driver = self
            .drivers
            .perform(id, DriverAction::SetAvailability(available))
            .await?;
        info!(driver = %id, available, "Driver availability changed");
        Ok(driver)
    }

    /// Creates the delivery for a confirmed order and hands it to the first available
    /// driver. Without a free driver the delivery stays `Pending`. Calling it again for
    /// the same order returns the existing delivery, retrying assignment if it is
    /// still pending.
    #[instrument(skip(self, pickup_address, dropoff_address))]
    pub async fn assign_for_order(
        &self,
        order_id: OrderId,
        user_id: UserId,
        pickup_address: String,
        dropoff_address: String,
    ) -> Result<Delivery, ApiError> {
        let delivery = match self
            .deliveries
            .create_delivery(DeliveryCreate {
                order_id,
                user_id,
                pickup_address,
                dropoff_address,
            })
            .await
        {
            Ok(id) => self.deliveries.require(id).await?,
            Err(DeliveryError::AlreadyExists(_)) => self
                .deliveries
                .find_for_order(order_id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("Delivery not found for {}", order_id)))?,
            Err(e) => return Err(e.into()),
        };
        if delivery.status != DeliveryStatus::Pending {
            return Ok(delivery);
        }

        for driver in self.drivers.available().await? {
            match self.drivers.perform(driver.id, DriverAction::Claim).await {
                Ok(_) => {}
                // Taken between the query and the claim.
                Err(DriverError::Unavailable(_)) => continue,
                Err(e) => return Err(e.into()),
            }
            let assigned = match self
                .deliveries
                .perform(delivery.id, DeliveryAction::Assign(driver.id))
                .await
            {
                Ok(assigned) => assigned,
                Err(e) => {
                    self.release(driver.id, false).await;
                    return Err(e.into());
                }
            };
            info!(delivery = %assigned.id, order = %order_id, driver = %driver.id, "Driver assigned");
            self.bus.publish(delivery_event(DELIVERY_ASSIGNED, &assigned));
            return Ok(assigned);
        }

        warn!(delivery = %delivery.id, order = %order_id, "No driver available, delivery left pending");
        Ok(delivery)
    }

    async fn release(&self, driver: DriverId, completed: bool) {
        if let Err(e) = self
            .drivers
            .perform(driver, DriverAction::Release { completed })
            .await
        {
            warn!(%driver, error = %e, "Could not release driver");
        }
    }

    /// Only the assigned driver (or an admin) moves a delivery along.
    async fn assigned_to(&self, principal: &Principal, id: DeliveryId) -> Result<Delivery, ApiError> {
        let delivery = self.deliveries.require(id).await?;
        if principal.is_admin() {
            return Ok(delivery);
        }
        let driver_id = delivery.driver_id.ok_or_else(ApiError::forbidden)?;
        self.own_driver(principal, driver_id).await?;
        Ok(delivery)
    }

    #[instrument(skip(self, principal))]
    pub async fn mark_picked_up(&self, principal: &Principal, id: DeliveryId) -> Result<Delivery, ApiError> {
        self.assigned_to(principal, id).await?;
        let delivery = self.deliveries.perform(id, DeliveryAction::PickUp).await?;
        self.bus.publish(delivery_event(DELIVERY_PICKED_UP, &delivery));
        Ok(delivery)
    }

    /// Completes the delivery and frees the driver for the next one.
    #[instrument(skip(self, principal))]
    pub async fn mark_delivered(&self, principal: &Principal, id: DeliveryId) -> Result<Delivery, ApiError> {
        self.assigned_to(principal, id).await?;
        let delivery = self.deliveries.perform(id, DeliveryAction::Complete).await?;
        if let Some(driver) = delivery.driver_id {
            self.release(driver, true).await;
        }
        self.bus.publish(delivery_event(DELIVERY_COMPLETED, &delivery));
        Ok(delivery)
    }

    /// Visible to the customer, the assigned driver and admins.
    #[instrument(skip(self, principal))]
    pub async fn delivery_for_order(
        &self,
        principal: &Principal,
        order_id: OrderId,
    ) -> Result<Delivery, ApiError> {
        let delivery = self
            .deliveries
            .find_for_order(order_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Delivery not found for {}", order_id)))?;
        if principal.require_self_or_admin(delivery.user_id).is_ok() {
            return Ok(delivery);
        }
        self.assigned_to(principal, delivery.id).await
    }
}
