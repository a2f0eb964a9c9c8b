//! # Restaurant Client
use crate::model::{
    MenuItemCreate, MenuItemId, MenuItemUpdate, Restaurant, RestaurantCreate, RestaurantId,
    RestaurantSearch, RestaurantUpdate,
};
use crate::restaurant_actor::{RestaurantAction, RestaurantError};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<Restaurant>,
}

impl RestaurantClient {
    pub fn new(inner: ResourceClient<Restaurant>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_restaurant(
        &self,
        params: RestaurantCreate,
    ) -> Result<RestaurantId, RestaurantError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, RestaurantError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Matches sorted by name.
    #[instrument(skip(self))]
    pub async fn search(&self, search: RestaurantSearch) -> Result<Vec<Restaurant>, RestaurantError> {
        let mut found = self
            .list(Filter::new(move |r: &Restaurant| search.matches(r)))
            .await?;
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    #[instrument(skip(self))]
    pub async fn perform(
        &self,
        id: RestaurantId,
        action: RestaurantAction,
    ) -> Result<Restaurant, RestaurantError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    pub async fn add_menu_item(
        &self,
        id: RestaurantId,
        item: MenuItemCreate,
    ) -> Result<Restaurant, RestaurantError> {
        self.perform(id, RestaurantAction::AddMenuItem(item)).await
    }

    pub async fn update_menu_item(
        &self,
        id: RestaurantId,
        item_id: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<Restaurant, RestaurantError> {
        self.perform(id, RestaurantAction::UpdateMenuItem(item_id, update))
            .await
    }

    pub async fn remove_menu_item(
        &self,
        id: RestaurantId,
        item_id: MenuItemId,
    ) -> Result<Restaurant, RestaurantError> {
        self.perform(id, RestaurantAction::RemoveMenuItem(item_id)).await
    }

    pub async fn set_item_availability(
        &self,
        id: RestaurantId,
        item_id: MenuItemId,
        available: bool,
    ) -> Result<Restaurant, RestaurantError> {
        self.perform(id, RestaurantAction::SetItemAvailability(item_id, available))
            .await
    }

    pub async fn set_open(&self, id: RestaurantId, open: bool) -> Result<Restaurant, RestaurantError> {
        let action = if open {
            RestaurantAction::Open
        } else {
            RestaurantAction::Close
        };
        self.perform(id, action).await
    }
}

#[async_trait]
impl ActorClient<Restaurant> for RestaurantClient {
    type Error = RestaurantError;

    fn inner(&self) -> &ResourceClient<Restaurant> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<RestaurantError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => RestaurantError::NotFound(id),
            Err(other) => RestaurantError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &RestaurantId) -> Self::Error {
        RestaurantError::NotFound(id.to_string())
    }
}
