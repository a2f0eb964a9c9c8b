//! Custom actions for the Cart actor.

use crate::model::{MenuItemId, RestaurantId};

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds `quantity` of a menu item, merging with an existing line.
    AddItem {
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
        quantity: u32,
    },
    /// Sets the quantity of a line; zero or less removes it.
    UpdateQuantity {
        menu_item_id: MenuItemId,
        quantity: i32,
    },
    RemoveItem(MenuItemId),
    Clear,
}
