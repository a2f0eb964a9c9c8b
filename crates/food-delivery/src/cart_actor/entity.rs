//! [`ActorEntity`] implementation for [`Cart`].

use super::{CartAction, CartError};
use crate::clients::RestaurantClient;
use crate::model::{Cart, CartCreate, CartId, CartItem, MenuItemId, RestaurantId};
use actor_framework::{ActorClient, ActorEntity};
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

impl Cart {
    async fn add_item(
        &mut self,
        restaurants: &RestaurantClient,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        let restaurant = restaurants.require(restaurant_id).await?;
        if !restaurant.open {
            return Err(CartError::RestaurantClosed(restaurant_id.to_string()));
        }
        let menu_item = restaurant
            .menu_item(menu_item_id)
            .ok_or_else(|| CartError::MenuItemNotFound(menu_item_id.to_string()))?;
        if !menu_item.available {
            return Err(CartError::ItemUnavailable(menu_item.name.clone()));
        }

        if let Some(current) = self.restaurant_id {
            if current != restaurant_id && !self.items.is_empty() {
                info!(cart = %self.id, from = %current, to = %restaurant_id, "Switching restaurant, clearing cart");
                self.items.clear();
            }
        }
        self.restaurant_id = Some(restaurant_id);

        match self.items.iter_mut().find(|i| i.menu_item_id == menu_item_id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or(
                    CartError::InvalidQuantity(i64::from(line.quantity) + i64::from(quantity)),
                )?;
                line.unit_price = menu_item.price;
            }
            None => self.items.push(CartItem {
                menu_item_id,
                name: menu_item.name.clone(),
                unit_price: menu_item.price,
                quantity,
            }),
        }
        Ok(())
    }

    fn require_line(&self, menu_item_id: MenuItemId) -> Result<(), CartError> {
        if self.item(menu_item_id).is_none() {
            return Err(CartError::ItemNotInCart(menu_item_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Cart {
    type Id = CartId;
    type Create = CartCreate;
    type Update = ();
    type Action = CartAction;
    type ActionResult = Cart;
    type Context = RestaurantClient;
    type Error = CartError;

    fn from_create_params(id: CartId, params: CartCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            user_id: params.user_id,
            restaurant_id: None,
            items: Vec::new(),
            total: 0.0,
            updated_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.user_id.to_string())
    }

    async fn on_update(&mut self, _update: (), _ctx: &RestaurantClient) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        restaurants: &RestaurantClient,
    ) -> Result<Cart, Self::Error> {
        match action {
            CartAction::AddItem {
                restaurant_id,
                menu_item_id,
                quantity,
            } => {
                self.add_item(restaurants, restaurant_id, menu_item_id, quantity)
                    .await?
            }
            CartAction::UpdateQuantity {
                menu_item_id,
                quantity,
            } => {
                self.require_line(menu_item_id)?;
                if quantity <= 0 {
                    self.items.retain(|i| i.menu_item_id != menu_item_id);
                } else if let Some(line) =
                    self.items.iter_mut().find(|i| i.menu_item_id == menu_item_id)
                {
                    line.quantity = quantity as u32;
                }
            }
            CartAction::RemoveItem(menu_item_id) => {
                self.require_line(menu_item_id)?;
                self.items.retain(|i| i.menu_item_id != menu_item_id);
            }
            CartAction::Clear => self.items.clear(),
        }
        self.touch();
        Ok(self.clone())
    }
}
