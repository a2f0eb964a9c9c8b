//! Custom actions for the Delivery actor.

use crate::model::DriverId;

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryAction {
    Assign(DriverId),
    PickUp,
    Complete,
    Fail(String),
}
