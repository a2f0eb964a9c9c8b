//! Custom actions for the Restaurant actor.
//!
//! Every action returns the restaurant as it is after the change.

use crate::model::{MenuItemCreate, MenuItemId, MenuItemUpdate};

#[derive(Debug, Clone)]
pub enum RestaurantAction {
    AddMenuItem(MenuItemCreate),
    UpdateMenuItem(MenuItemId, MenuItemUpdate),
    RemoveMenuItem(MenuItemId),
    SetItemAvailability(MenuItemId, bool),
    Open,
    Close,
    /// A 1 to 5 star rating folded into the running average.
    Rate(u8),
}
