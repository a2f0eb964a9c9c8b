//! [`ActorEntity`] implementation for [`Restaurant`].

use super::{RestaurantAction, RestaurantError};
use crate::model::{
    round_cents, MenuItem, MenuItemCreate, MenuItemId, Restaurant, RestaurantCreate,
    RestaurantId, RestaurantUpdate,
};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

fn validate_price(price: f64) -> Result<f64, RestaurantError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(RestaurantError::ValidationError(format!(
            "price must be positive, got {}",
            price
        )));
    }
    Ok(round_cents(price))
}

fn validate_name(field: &str, value: &str) -> Result<(), RestaurantError> {
    if value.trim().is_empty() {
        return Err(RestaurantError::ValidationError(format!(
            "{} must not be blank",
            field
        )));
    }
    Ok(())
}

impl Restaurant {
    fn add_menu_item(&mut self, params: MenuItemCreate) -> Result<(), RestaurantError> {
        validate_name("item name", &params.name)?;
        let price = validate_price(params.price)?;
        let id = MenuItemId(self.next_item_id);
        self.next_item_id += 1;
        self.menu.push(MenuItem {
            id,
            name: params.name,
            description: params.description,
            price,
            category: params.category,
            available: true,
        });
        Ok(())
    }

    fn require_item(&mut self, id: MenuItemId) -> Result<&mut MenuItem, RestaurantError> {
        let restaurant_id = self.id;
        self.menu_item_mut(id)
            .ok_or_else(|| RestaurantError::MenuItemNotFound(format!("{} in {}", id, restaurant_id)))
    }
}

#[async_trait]
impl ActorEntity for Restaurant {
    type Id = RestaurantId;
    type Create = RestaurantCreate;
    type Update = RestaurantUpdate;
    type Action = RestaurantAction;
    type ActionResult = Restaurant;
    type Context = ();
    type Error = RestaurantError;

    /// New restaurants start closed with an empty menu.
    fn from_create_params(id: RestaurantId, params: RestaurantCreate) -> Result<Self, Self::Error> {
        validate_name("name", &params.name)?;
        validate_name("address", &params.address)?;
        let now = Utc::now();
        Ok(Self {
            id,
            owner_id: params.owner_id,
            name: params.name,
            cuisine: params.cuisine,
            address: params.address,
            open: false,
            rating: 0.0,
            rating_count: 0,
            menu: Vec::new(),
            next_item_id: 1,
            created_at: now,
            updated_at: now,
        })
    }

    async fn on_update(&mut self, update: RestaurantUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = &update.name {
            validate_name("name", name)?;
        }
        if let Some(address) = &update.address {
            validate_name("address", address)?;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(cuisine) = update.cuisine {
            self.cuisine = cuisine;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RestaurantAction,
        _ctx: &(),
    ) -> Result<Restaurant, Self::Error> {
        match action {
            RestaurantAction::AddMenuItem(params) => self.add_menu_item(params)?,
            RestaurantAction::UpdateMenuItem(id, update) => {
                let price = update.price.map(validate_price).transpose()?;
                if let Some(name) = &update.name {
                    validate_name("item name", name)?;
                }
                let item = self.require_item(id)?;
                if let Some(name) = update.name {
                    item.name = name;
                }
                if let Some(description) = update.description {
                    item.description = description;
                }
                if let Some(price) = price {
                    item.price = price;
                }
                if let Some(category) = update.category {
                    item.category = category;
                }
            }
            RestaurantAction::RemoveMenuItem(id) => {
                self.require_item(id)?;
                self.menu.retain(|item| item.id != id);
            }
            RestaurantAction::SetItemAvailability(id, available) => {
                self.require_item(id)?.available = available;
            }
            RestaurantAction::Open => self.open = true,
            RestaurantAction::Close => self.open = false,
            RestaurantAction::Rate(stars) => {
                if !(1..=5).contains(&stars) {
                    return Err(RestaurantError::ValidationError(format!(
                        "rating must be between 1 and 5, got {}",
                        stars
                    )));
                }
                let total = self.rating * self.rating_count as f64 + stars as f64;
                self.rating_count += 1;
                self.rating = total / self.rating_count as f64;
            }
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItemUpdate, UserId};

    fn trattoria() -> Restaurant {
        Restaurant::from_create_params(
            RestaurantId(1),
            RestaurantCreate {
                owner_id: UserId(9),
                name: "Trattoria".into(),
                cuisine: "Italian".into(),
                address: "2 Via Roma".into(),
            },
        )
        .unwrap()
    }

    fn pizza() -> MenuItemCreate {
        MenuItemCreate {
            name: "Margherita".into(),
            description: "Tomato, mozzarella".into(),
            price: 9.5,
            category: "Pizza".into(),
        }
    }

    #[tokio::test]
    async fn test_menu_items_get_sequential_ids() {
        let mut r = trattoria();
        r.handle_action(RestaurantAction::AddMenuItem(pizza()), &()).await.unwrap();
        let r = r.handle_action(RestaurantAction::AddMenuItem(pizza()), &()).await.unwrap();
        let ids: Vec<_> = r.menu.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![MenuItemId(1), MenuItemId(2)]);
    }

    #[tokio::test]
    async fn test_invalid_price_is_rejected_without_change() {
        let mut r = trattoria();
        r.handle_action(RestaurantAction::AddMenuItem(pizza()), &()).await.unwrap();
        let result = r
            .handle_action(
                RestaurantAction::UpdateMenuItem(
                    MenuItemId(1),
                    MenuItemUpdate {
                        name: Some("Free pizza".into()),
                        price: Some(0.0),
                        ..Default::default()
                    },
                ),
                &(),
            )
            .await;
        assert!(matches!(result, Err(RestaurantError::ValidationError(_))));
        assert_eq!(r.menu[0].name, "Margherita");
    }

    #[tokio::test]
    async fn test_rating_is_running_average() {
        let mut r = trattoria();
        r.handle_action(RestaurantAction::Rate(5), &()).await.unwrap();
        let r = r.handle_action(RestaurantAction::Rate(4), &()).await.unwrap();
        assert_eq!(r.rating, 4.5);
        assert_eq!(r.rating_count, 2);
    }

    #[tokio::test]
    async fn test_unknown_menu_item() {
        let mut r = trattoria();
        let result = r
            .handle_action(RestaurantAction::RemoveMenuItem(MenuItemId(42)), &())
            .await;
        assert!(matches!(result, Err(RestaurantError::MenuItemNotFound(_))));
    }
}
