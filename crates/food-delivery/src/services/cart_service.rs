//! The signed-in user's cart.

use crate::auth::Principal;
use crate::cart_actor::CartAction;
use crate::clients::CartClient;
use crate::error::ApiError;
use crate::model::{Cart, MenuItemId, RestaurantId};
use tracing::instrument;

#[derive(Clone)]
pub struct CartService {
    carts: CartClient,
}

impl CartService {
    pub fn new(carts: CartClient) -> Self {
        Self { carts }
    }

    #[instrument(skip(self, principal), fields(user = %principal.user_id))]
    pub async fn get_or_create_cart(&self, principal: &Principal) -> Result<Cart, ApiError> {
        Ok(self.carts.get_or_create(principal.user_id).await?)
    }

    async fn perform(&self, principal: &Principal, action: CartAction) -> Result<Cart, ApiError> {
        let cart = self.carts.get_or_create(principal.user_id).await?;
        Ok(self.carts.perform(cart.id, action).await?)
    }

    /// Items of another restaurant are dropped first.
    #[instrument(skip(self, principal), fields(user = %principal.user_id))]
    pub async fn add_item(
        &self,
        principal: &Principal,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        self.perform(
            principal,
            CartAction::AddItem {
                restaurant_id,
                menu_item_id,
                quantity,
            },
        )
        .await
    }

    /// Zero or a negative quantity removes the line.
    #[instrument(skip(self, principal), fields(user = %principal.user_id))]
    pub async fn update_item_quantity(
        &self,
        principal: &Principal,
        menu_item_id: MenuItemId,
        quantity: i32,
    ) -> Result<Cart, ApiError> {
        self.perform(
            principal,
            CartAction::UpdateQuantity {
                menu_item_id,
                quantity,
            },
        )
        .await
    }

    #[instrument(skip(self, principal), fields(user = %principal.user_id))]
    pub async fn remove_item(
        &self,
        principal: &Principal,
        menu_item_id: MenuItemId,
    ) -> Result<Cart, ApiError> {
        self.perform(principal, CartAction::RemoveItem(menu_item_id)).await
    }

    #[instrument(skip(self, principal), fields(user = %principal.user_id))]
    pub async fn clear_cart(&self, principal: &Principal) -> Result<Cart, ApiError> {
        self.perform(principal, CartAction::Clear).await
    }
}
