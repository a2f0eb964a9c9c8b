use super::{round_cents, CartItem, MenuItemId, PaymentId, PaymentMethod, RestaurantId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

entity_id!(Order, "order");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Moves allowed by the kitchen and delivery flow. Confirming and cancelling a
    /// `Pending` order go through their own actions.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Confirmed, Preparing)
                | (Preparing, ReadyForPickup)
                | (Confirmed | Preparing | ReadyForPickup, OutForDelivery)
                | (OutForDelivery, Delivered)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::ReadyForPickup => "READY_FOR_PICKUP",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line copied from the cart at placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            menu_item_id: item.menu_item_id,
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub delivery_address: String,
    pub payment_id: PaymentId,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Bumped on every change.
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn compute_total(items: &[OrderItem]) -> f64 {
        round_cents(
            items
                .iter()
                .map(|i| i.unit_price * i.quantity as f64)
                .sum(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
    pub payment_id: PaymentId,
    pub payment_method: PaymentMethod,
}

/// Only the delivery address may change, and only while the order is pending.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub delivery_address: String,
}

/// What a customer submits at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub payment_id: PaymentId,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            user_id: order.user_id,
            restaurant_id: order.restaurant_id,
            status: order.status,
            items: order.items.clone(),
            total_amount: order.total_amount,
            payment_id: order.payment_id,
            delivery_address: order.delivery_address.clone(),
            created_at: order.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitchen_and_delivery_transitions() {
        use OrderStatus::*;
        assert!(Confirmed.can_advance_to(Preparing));
        assert!(Preparing.can_advance_to(ReadyForPickup));
        assert!(ReadyForPickup.can_advance_to(OutForDelivery));
        assert!(Confirmed.can_advance_to(OutForDelivery));
        assert!(OutForDelivery.can_advance_to(Delivered));

        assert!(!Pending.can_advance_to(Preparing));
        assert!(!Delivered.can_advance_to(OutForDelivery));
        assert!(!Cancelled.can_advance_to(Confirmed));
        assert!(!ReadyForPickup.can_advance_to(Preparing));
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let items = vec![
            OrderItem {
                menu_item_id: MenuItemId(1),
                name: "Margherita".into(),
                unit_price: 9.5,
                quantity: 2,
            },
            OrderItem {
                menu_item_id: MenuItemId(2),
                name: "Tiramisu".into(),
                unit_price: 4.25,
                quantity: 1,
            },
        ];
        assert_eq!(Order::compute_total(&items), 23.25);
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap();
        assert_eq!(json, "\"READY_FOR_PICKUP\"");
    }
}
