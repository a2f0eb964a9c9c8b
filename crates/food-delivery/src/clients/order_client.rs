//! # Order Client
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, UserId};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .list(Filter::new(move |o: &Order| o.user_id == user_id))
            .await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn change_address(&self, id: OrderId, delivery_address: String) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(id, OrderUpdate { delivery_address })
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn perform(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    pub async fn confirm(&self, id: OrderId) -> Result<Order, OrderError> {
        self.perform(id, OrderAction::Confirm).await
    }

    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.perform(id, OrderAction::Cancel).await
    }

    pub async fn advance(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        self.perform(id, OrderAction::AdvanceTo(status)).await
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &OrderId) -> Self::Error {
        OrderError::NotFound(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItemId, OrderItem, PaymentId, PaymentMethod, RestaurantId};
    use actor_framework::mock::MockClient;

    fn params() -> OrderCreate {
        OrderCreate {
            user_id: UserId(1),
            restaurant_id: RestaurantId(1),
            items: vec![OrderItem {
                menu_item_id: MenuItemId(1),
                name: "Ramen".into(),
                unit_price: 13.0,
                quantity: 1,
            }],
            delivery_address: "7 Elm Street".into(),
            payment_id: PaymentId(1),
            payment_method: PaymentMethod::Wallet,
        }
    }

    #[tokio::test]
    async fn test_create_order_returns_id() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create().return_ok(OrderId(5));
        let client = OrderClient::new(mock.client());

        assert_eq!(client.create_order(params()).await.unwrap(), OrderId(5));
        mock.verify();
    }

    #[tokio::test]
    async fn test_entity_errors_are_recovered() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(5)).return_err(FrameworkError::EntityError(Box::new(
            OrderError::InvalidState("cannot cancel order order_5 in status CONFIRMED".into()),
        )));
        mock.expect_action(OrderId(6))
            .return_err(FrameworkError::NotFound("order_6".into()));
        mock.expect_create().return_err(FrameworkError::ActorClosed);
        let client = OrderClient::new(mock.client());

        assert!(matches!(
            client.cancel(OrderId(5)).await,
            Err(OrderError::InvalidState(_))
        ));
        assert_eq!(
            client.cancel(OrderId(6)).await,
            Err(OrderError::NotFound("order_6".into()))
        );
        assert!(matches!(
            client.create_order(params()).await,
            Err(OrderError::ActorCommunicationError(_))
        ));
        mock.verify();
    }
}
