//! Starts a delivery once the restaurant confirms an order.

use super::id_field;
use crate::events::ORDER_CONFIRMED;
use crate::model::{OrderId, UserId};
use crate::services::DeliveryService;
use actor_framework::{DomainEvent, EventHandler, HandlerError};
use async_trait::async_trait;

pub struct DeliveryListener {
    deliveries: DeliveryService,
}

impl DeliveryListener {
    pub fn new(deliveries: DeliveryService) -> Self {
        Self { deliveries }
    }
}

#[async_trait]
impl EventHandler for DeliveryListener {
    fn name(&self) -> &str {
        "delivery-service"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        if event.event_type != ORDER_CONFIRMED {
            return Ok(());
        }
        let order_id = OrderId(id_field(event, "orderId")?);
        let user_id = UserId(id_field(event, "userId")?);
        let pickup = event.str_field("pickupAddress").unwrap_or_default().to_string();
        let dropoff = event.str_field("deliveryAddress").unwrap_or_default().to_string();
        self.deliveries
            .assign_for_order(order_id, user_id, pickup, dropoff)
            .await?;
        Ok(())
    }
}
