use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

entity_id!(Restaurant, "restaurant");
entity_id!(MenuItem, "item");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub available: bool,
}

/// A restaurant and its menu.
///
/// Menu item ids are allocated per restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub owner_id: UserId,
    pub name: String,
    pub cuisine: String,
    pub address: String,
    pub open: bool,
    pub rating: f64,
    pub rating_count: u32,
    pub menu: Vec<MenuItem>,
    pub(crate) next_item_id: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    pub fn menu_item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == id)
    }

    pub(crate) fn menu_item_mut(&mut self, id: MenuItemId) -> Option<&mut MenuItem> {
        self.menu.iter_mut().find(|item| item.id == id)
    }

    pub fn available_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.menu.iter().filter(|item| item.available)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub owner_id: UserId,
    pub name: String,
    pub cuisine: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

/// Search criteria; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct RestaurantSearch {
    pub cuisine: Option<String>,
    pub open_only: bool,
    pub name_contains: Option<String>,
}

impl RestaurantSearch {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        if self.open_only && !restaurant.open {
            return false;
        }
        if let Some(cuisine) = &self.cuisine {
            if !restaurant.cuisine.eq_ignore_ascii_case(cuisine) {
                return false;
            }
        }
        if let Some(fragment) = &self.name_contains {
            if !restaurant
                .name
                .to_lowercase()
                .contains(&fragment.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}
