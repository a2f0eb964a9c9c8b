use super::{OrderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

entity_id!(Delivery, "delivery");
entity_id!(Driver, "driver");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    Assigned,
    PickedUp,
    Delivered,
    Failed,
}

/// One delivery per order; the order id is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: DeliveryId,
    pub order_id: OrderId,
    /// The customer, so delivery events can be routed to them.
    pub user_id: UserId,
    pub driver_id: Option<DriverId>,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub status: DeliveryStatus,
    pub failure_reason: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DeliveryCreate {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub pickup_address: String,
    pub dropoff_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: DriverId,
    /// The account the driver signs in with.
    pub user_id: UserId,
    pub name: String,
    pub phone: String,
    pub vehicle: String,
    pub available: bool,
    pub completed_deliveries: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverCreate {
    pub user_id: UserId,
    pub name: String,
    pub phone: String,
    pub vehicle: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub vehicle: Option<String>,
}
