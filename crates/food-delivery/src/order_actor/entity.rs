//! [`ActorEntity`] implementation for [`Order`].

use super::{OrderAction, OrderError};
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

impl Order {
    fn transition(&mut self, next: OrderStatus) {
        self.status = next;
        self.version += 1;
        self.updated_at = Utc::now();
    }

    fn refuse(&self, what: &str) -> OrderError {
        OrderError::InvalidState(format!(
            "cannot {} order {} in status {}",
            what, self.id, self.status
        ))
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("order has no items".into()));
        }
        if params.items.iter().any(|i| i.quantity == 0) {
            return Err(OrderError::ValidationError("item quantity must be positive".into()));
        }
        if params.delivery_address.trim().is_empty() {
            return Err(OrderError::ValidationError("delivery address is required".into()));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            user_id: params.user_id,
            restaurant_id: params.restaurant_id,
            total_amount: Order::compute_total(&params.items),
            items: params.items,
            delivery_address: params.delivery_address,
            payment_id: params.payment_id,
            payment_method: params.payment_method,
            status: OrderStatus::Pending,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if self.status != OrderStatus::Pending {
            return Err(self.refuse("change the address of"));
        }
        if update.delivery_address.trim().is_empty() {
            return Err(OrderError::ValidationError("delivery address is required".into()));
        }
        self.delivery_address = update.delivery_address;
        self.version += 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(&mut self, action: OrderAction, _ctx: &()) -> Result<Order, Self::Error> {
        match action {
            OrderAction::Confirm => {
                if self.status != OrderStatus::Pending {
                    return Err(self.refuse("confirm"));
                }
                self.transition(OrderStatus::Confirmed);
            }
            OrderAction::Cancel => {
                if self.status != OrderStatus::Pending {
                    return Err(self.refuse("cancel"));
                }
                self.transition(OrderStatus::Cancelled);
            }
            OrderAction::AdvanceTo(next) => {
                if !self.status.can_advance_to(next) {
                    return Err(self.refuse(&format!("move to {}", next)));
                }
                self.transition(next);
            }
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItemId, OrderItem, PaymentId, PaymentMethod, RestaurantId, UserId};

    fn pending_order() -> Order {
        Order::from_create_params(
            OrderId(1),
            OrderCreate {
                user_id: UserId(1),
                restaurant_id: RestaurantId(1),
                items: vec![OrderItem {
                    menu_item_id: MenuItemId(1),
                    name: "Pad Thai".into(),
                    unit_price: 12.4,
                    quantity: 2,
                }],
                delivery_address: "7 Elm Street".into(),
                payment_id: PaymentId(1),
                payment_method: PaymentMethod::CreditCard,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_order_is_pending_with_total() {
        let order = pending_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 24.8);
        assert_eq!(order.version, 0);
    }

    #[test]
    fn test_empty_order_is_rejected() {
        let mut params = OrderCreate {
            user_id: UserId(1),
            restaurant_id: RestaurantId(1),
            items: vec![],
            delivery_address: "7 Elm Street".into(),
            payment_id: PaymentId(1),
            payment_method: PaymentMethod::Wallet,
        };
        assert!(Order::from_create_params(OrderId(1), params.clone()).is_err());
        params.items = pending_order().items;
        params.delivery_address = "  ".into();
        assert!(Order::from_create_params(OrderId(1), params).is_err());
    }

    #[tokio::test]
    async fn test_cancel_only_from_pending() {
        let mut order = pending_order();
        let cancelled = order.handle_action(OrderAction::Cancel, &()).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.version, 1);

        let err = order.handle_action(OrderAction::Cancel, &()).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidState(_)));

        let mut confirmed = pending_order();
        confirmed.handle_action(OrderAction::Confirm, &()).await.unwrap();
        let err = confirmed.handle_action(OrderAction::Cancel, &()).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidState(_)));
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_advance_follows_lifecycle() {
        let mut order = pending_order();
        let err = order
            .handle_action(OrderAction::AdvanceTo(OrderStatus::Preparing), &())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidState(_)));

        order.handle_action(OrderAction::Confirm, &()).await.unwrap();
        for next in [
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            order.handle_action(OrderAction::AdvanceTo(next), &()).await.unwrap();
        }
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.version, 5);
    }

    #[tokio::test]
    async fn test_address_change_only_while_pending() {
        let mut order = pending_order();
        order
            .on_update(OrderUpdate { delivery_address: "9 Oak Road".into() }, &())
            .await
            .unwrap();
        assert_eq!(order.delivery_address, "9 Oak Road");

        order.handle_action(OrderAction::Confirm, &()).await.unwrap();
        let err = order
            .on_update(OrderUpdate { delivery_address: "1 Pine Lane".into() }, &())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidState(_)));
    }
}
