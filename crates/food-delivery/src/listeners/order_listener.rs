//! Follows delivery milestones on the order.

use super::id_field;
use crate::events::{DELIVERY_COMPLETED, DELIVERY_PICKED_UP};
use crate::model::{OrderId, OrderStatus};
use crate::services::OrderService;
use actor_framework::{DomainEvent, EventHandler, HandlerError};
use async_trait::async_trait;
use tracing::debug;

pub struct OrderListener {
    orders: OrderService,
}

impl OrderListener {
    pub fn new(orders: OrderService) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl EventHandler for OrderListener {
    fn name(&self) -> &str {
        "order-service"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        let target = match event.event_type.as_str() {
            DELIVERY_PICKED_UP => OrderStatus::OutForDelivery,
            DELIVERY_COMPLETED => OrderStatus::Delivered,
            other => {
                debug!(event_type = other, "Ignored");
                return Ok(());
            }
        };
        let order_id = OrderId(id_field(event, "orderId")?);
        self.orders.apply_delivery_update(order_id, target).await?;
        Ok(())
    }
}
