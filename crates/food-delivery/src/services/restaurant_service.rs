//! Restaurants and their menus. Reads are cached; every write evicts the entry.

use crate::auth::Principal;
use crate::clients::RestaurantClient;
use crate::error::ApiError;
use crate::model::{
    MenuItemCreate, MenuItemId, MenuItemUpdate, Restaurant, RestaurantCreate, RestaurantId,
    RestaurantSearch, RestaurantUpdate, Role,
};
use crate::restaurant_actor::RestaurantAction;
use actor_framework::{ActorClient, CacheAside};
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct RestaurantService {
    restaurants: RestaurantClient,
    cache: CacheAside<RestaurantId, Restaurant>,
}

impl RestaurantService {
    pub fn new(restaurants: RestaurantClient, ttl: Duration) -> Self {
        Self {
            restaurants,
            cache: CacheAside::new("restaurants", ttl),
        }
    }

    pub fn cache(&self) -> &CacheAside<RestaurantId, Restaurant> {
        &self.cache
    }

    /// Owners always own what they create; an admin may create on behalf of an owner.
    #[instrument(skip(self, principal))]
    pub async fn create_restaurant(
        &self,
        principal: &Principal,
        mut params: RestaurantCreate,
    ) -> Result<Restaurant, ApiError> {
        principal.require_any_role(&[Role::RestaurantOwner, Role::Admin])?;
        if !principal.is_admin() {
            params.owner_id = principal.user_id;
        }
        let id = self.restaurants.create_restaurant(params).await?;
        let restaurant = self.restaurants.require(id).await?;
        info!(restaurant = %id, owner = %restaurant.owner_id, "Restaurant created");
        Ok(restaurant)
    }

    #[instrument(skip(self))]
    pub async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        self.cache
            .get_or_load(id, || async {
                Ok::<_, ApiError>(self.restaurants.require(id).await?)
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, search: RestaurantSearch) -> Result<Vec<Restaurant>, ApiError> {
        Ok(self.restaurants.search(search).await?)
    }

    /// The restaurant, if `principal` owns it or is an admin.
    async fn owned(&self, principal: &Principal, id: RestaurantId) -> Result<Restaurant, ApiError> {
        let restaurant = self.restaurants.require(id).await?;
        if restaurant.owner_id != principal.user_id && !principal.is_admin() {
            return Err(ApiError::forbidden());
        }
        Ok(restaurant)
    }

    async fn mutate(
        &self,
        principal: &Principal,
        id: RestaurantId,
        action: RestaurantAction,
    ) -> Result<Restaurant, ApiError> {
        self.owned(principal, id).await?;
        let restaurant = self.restaurants.perform(id, action).await?;
        self.cache.evict(&id).await;
        Ok(restaurant)
    }

    #[instrument(skip(self, principal))]
    pub async fn update_restaurant(
        &self,
        principal: &Principal,
        id: RestaurantId,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, ApiError> {
        self.owned(principal, id).await?;
        let restaurant = self.restaurants.update_restaurant(id, update).await?;
        self.cache.evict(&id).await;
        Ok(restaurant)
    }

    #[instrument(skip(self, principal))]
    pub async fn add_menu_item(
        &self,
        principal: &Principal,
        id: RestaurantId,
        item: MenuItemCreate,
    ) -> Result<Restaurant, ApiError> {
        self.mutate(principal, id, RestaurantAction::AddMenuItem(item)).await
    }

    #[instrument(skip(self, principal))]
    pub async fn update_menu_item(
        &self,
        principal: &Principal,
        id: RestaurantId,
        item_id: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<Restaurant, ApiError> {
        self.mutate(principal, id, RestaurantAction::UpdateMenuItem(item_id, update))
            .await
    }

    #[instrument(skip(self, principal))]
    pub async fn remove_menu_item(
        &self,
        principal: &Principal,
        id: RestaurantId,
        item_id: MenuItemId,
    ) -> Result<Restaurant, ApiError> {
        self.mutate(principal, id, RestaurantAction::RemoveMenuItem(item_id))
            .await
    }

    #[instrument(skip(self, principal))]
    pub async fn set_item_availability(
        &self,
        principal: &Principal,
        id: RestaurantId,
        item_id: MenuItemId,
        available: bool,
    ) -> Result<Restaurant, ApiError> {
        self.mutate(
            principal,
            id,
            RestaurantAction::SetItemAvailability(item_id, available),
        )
        .await
    }

    #[instrument(skip(self, principal))]
    pub async fn set_open(
        &self,
        principal: &Principal,
        id: RestaurantId,
        open: bool,
    ) -> Result<Restaurant, ApiError> {
        let action = if open {
            RestaurantAction::Open
        } else {
            RestaurantAction::Close
        };
        let restaurant = self.mutate(principal, id, action).await?;
        info!(restaurant = %id, open, "Restaurant opening hours changed");
        Ok(restaurant)
    }

    /// Any signed-in customer may rate.
    #[instrument(skip(self, principal))]
    pub async fn rate(
        &self,
        principal: &Principal,
        id: RestaurantId,
        stars: u8,
    ) -> Result<Restaurant, ApiError> {
        principal.require_any_role(&[Role::Customer, Role::Admin])?;
        let restaurant = self.restaurants.perform(id, RestaurantAction::Rate(stars)).await?;
        self.cache.evict(&id).await;
        Ok(restaurant)
    }
}
