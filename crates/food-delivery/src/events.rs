//! Event types published on the bus and the payloads they carry.
//!
//! Payload keys are camelCase JSON so they read the same in logs and dead letters as
//! they would on a broker.

use crate::model::{Delivery, Order, Payment, User};
use actor_framework::{DomainEvent, Topic};
use serde_json::json;

pub const USER_REGISTERED: &str = "USER_REGISTERED";

pub const ORDER_CREATED: &str = "ORDER_CREATED";
pub const ORDER_CONFIRMED: &str = "ORDER_CONFIRMED";
pub const ORDER_CANCELLED: &str = "ORDER_CANCELLED";
pub const ORDER_STATUS_CHANGED: &str = "ORDER_STATUS_CHANGED";
pub const ORDER_DELIVERED: &str = "ORDER_DELIVERED";

pub const PAYMENT_COMPLETED: &str = "PAYMENT_COMPLETED";
pub const PAYMENT_FAILED: &str = "PAYMENT_FAILED";
pub const PAYMENT_REFUNDED: &str = "PAYMENT_REFUNDED";

pub const DELIVERY_ASSIGNED: &str = "DELIVERY_ASSIGNED";
pub const DELIVERY_PICKED_UP: &str = "DELIVERY_PICKED_UP";
pub const DELIVERY_COMPLETED: &str = "DELIVERY_COMPLETED";

pub fn user_event(event_type: &str, user: &User) -> DomainEvent {
    DomainEvent::new(
        Topic::UserEvents,
        event_type,
        user.id.0,
        json!({
            "userId": user.id.0,
            "email": user.email,
            "name": user.name,
            "role": user.role,
        }),
    )
}

/// `extra` fields are merged into the standard order payload.
pub fn order_event(event_type: &str, order: &Order, extra: serde_json::Value) -> DomainEvent {
    let mut payload = json!({
        "orderId": order.id.0,
        "userId": order.user_id.0,
        "restaurantId": order.restaurant_id.0,
        "status": order.status,
        "totalAmount": order.total_amount,
        "deliveryAddress": order.delivery_address,
    });
    if let (Some(target), serde_json::Value::Object(more)) = (payload.as_object_mut(), extra) {
        target.extend(more);
    }
    DomainEvent::new(Topic::OrderEvents, event_type, order.id.0, payload)
}

pub fn payment_event(event_type: &str, payment: &Payment) -> DomainEvent {
    DomainEvent::new(
        Topic::PaymentEvents,
        event_type,
        payment.id.0,
        json!({
            "paymentId": payment.id.0,
            "reference": payment.reference,
            "userId": payment.user_id.0,
            "amount": payment.amount,
            "status": payment.status,
            "reason": payment.failure_reason,
        }),
    )
}

pub fn delivery_event(event_type: &str, delivery: &Delivery) -> DomainEvent {
    DomainEvent::new(
        Topic::DeliveryEvents,
        event_type,
        delivery.order_id.0,
        json!({
            "deliveryId": delivery.id.0,
            "orderId": delivery.order_id.0,
            "userId": delivery.user_id.0,
            "driverId": delivery.driver_id.map(|d| d.0),
            "status": delivery.status,
        }),
    )
}
