use super::{round_cents, MenuItemId, RestaurantId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

entity_id!(Cart, "cart");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// A user's shopping cart. Holds items of one restaurant at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub restaurant_id: Option<RestaurantId>,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, menu_item_id: MenuItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.menu_item_id == menu_item_id)
    }

    /// Saturates at `u32::MAX`.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, i| count.saturating_add(i.quantity))
    }

    /// Recomputes `total` and forgets the restaurant once the cart is empty.
    pub(crate) fn touch(&mut self) {
        self.total = round_cents(self.items.iter().map(CartItem::subtotal).sum());
        if self.items.is_empty() {
            self.restaurant_id = None;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct CartCreate {
    pub user_id: UserId,
}
