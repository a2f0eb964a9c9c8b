//! # Cart Client
use crate::cart_actor::{CartAction, CartError};
use crate::model::{Cart, CartCreate, CartId, MenuItemId, RestaurantId, UserId};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn find_for_user(&self, user_id: UserId) -> Result<Option<Cart>, CartError> {
        debug!("Sending request");
        let mut carts = self
            .list(Filter::new(move |c: &Cart| c.user_id == user_id))
            .await?;
        Ok(carts.pop())
    }

    /// The user's cart, created empty on first use.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, CartError> {
        if let Some(cart) = self.find_for_user(user_id).await? {
            return Ok(cart);
        }
        match self.inner.create(CartCreate { user_id }).await {
            Ok(id) => self.require(id).await,
            // Created concurrently by another request.
            Err(FrameworkError::Conflict(_)) => self
                .find_for_user(user_id)
                .await?
                .ok_or_else(|| CartError::NotFound(user_id.to_string())),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn perform(&self, id: CartId, action: CartAction) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    pub async fn add_item(
        &self,
        id: CartId,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        self.perform(
            id,
            CartAction::AddItem {
                restaurant_id,
                menu_item_id,
                quantity,
            },
        )
        .await
    }

    pub async fn clear(&self, id: CartId) -> Result<Cart, CartError> {
        self.perform(id, CartAction::Clear).await
    }
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<CartError>() {
            Ok(typed) => typed,
            Err(FrameworkError::Conflict(user)) => CartError::AlreadyExists(user),
            Err(FrameworkError::NotFound(id)) => CartError::NotFound(id),
            Err(other) => CartError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &CartId) -> Self::Error {
        CartError::NotFound(id.to_string())
    }
}
