//! Order placement and the order lifecycle.
//!
//! `place_order` is a straight sequence of calls to the cart, restaurant, payment and
//! order actors. The first three go through a per-dependency circuit breaker and are
//! retried on transient errors; the flow as a whole is never retried, since that would
//! charge twice. Progress is written to the saga log. Nothing is rolled back: a payment
//! taken before a later step fails stays charged, is named in a warning, and the failed
//! saga is left for an operator (see [`SagaLogClient::find_failed`]).

use crate::auth::Principal;
use crate::clients::{CartClient, OrderClient, PaymentClient, RestaurantClient, SagaLogClient};
use crate::config::ResilienceConfig;
use crate::error::{ApiError, FieldErrors};
use crate::events::{
    order_event, ORDER_CANCELLED, ORDER_CONFIRMED, ORDER_CREATED, ORDER_DELIVERED,
    ORDER_STATUS_CHANGED,
};
use crate::model::{
    Cart, Order, OrderCreate, OrderId, OrderItem, OrderResponse, OrderStatus, PaymentStatus,
    PlaceOrderRequest, Role, SagaId, UserId,
};
use crate::saga_actor::SagaAction;
use crate::services::PaymentService;
use actor_framework::{retry_with_backoff, ActorClient, CircuitBreaker, EventBus, RetryPolicy};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const PLACE_ORDER_SAGA: &str = "place-order";

/// One breaker per downstream dependency of order placement.
pub struct OrderBreakers {
    pub cart: CircuitBreaker,
    pub restaurant: CircuitBreaker,
    pub payment: CircuitBreaker,
}

impl OrderBreakers {
    pub fn new(config: &ResilienceConfig) -> Self {
        let settings = config.circuit_breaker.breaker_config();
        Self {
            cart: CircuitBreaker::new("cart-service", settings.clone()),
            restaurant: CircuitBreaker::new("restaurant-service", settings.clone()),
            payment: CircuitBreaker::new("payment-service", settings),
        }
    }
}

/// The clients order handling talks to.
#[derive(Clone)]
pub struct OrderDependencies {
    pub orders: OrderClient,
    pub carts: CartClient,
    pub restaurants: RestaurantClient,
    pub payment_records: PaymentClient,
    pub payments: PaymentService,
    pub sagas: SagaLogClient,
}

#[derive(Clone)]
pub struct OrderService {
    deps: OrderDependencies,
    bus: EventBus,
    breakers: Arc<OrderBreakers>,
    retry: RetryPolicy,
}

/// Writes a saga's progress. The log is an audit trail: if it cannot be written the
/// order flow carries on and the gap is logged.
struct SagaRun<'a> {
    log: &'a SagaLogClient,
    id: Option<SagaId>,
}

impl<'a> SagaRun<'a> {
    async fn begin(log: &'a SagaLogClient, context: Value) -> SagaRun<'a> {
        let id = match log.begin(PLACE_ORDER_SAGA, context).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Saga log unavailable, continuing without it");
                None
            }
        };
        Self { log, id }
    }

    async fn record(&self, action: SagaAction) {
        if let Some(id) = self.id {
            if let Err(e) = self.log.record(id, action).await {
                warn!(saga = %id, error = %e, "Could not write saga log");
            }
        }
    }

    async fn start(&self, step: &str) {
        self.record(SagaAction::StartStep(step.to_string())).await;
    }

    /// Records how the current step ended and passes the result through.
    async fn settle<T>(
        &self,
        result: Result<T, ApiError>,
        retries: u32,
        summary: impl FnOnce(&T) -> Option<Value>,
    ) -> Result<T, ApiError> {
        match &result {
            Ok(value) => {
                self.record(SagaAction::CompleteStep {
                    result: summary(value),
                    retries,
                })
                .await
            }
            Err(e) => {
                self.record(SagaAction::FailStep {
                    error: e.to_string(),
                    retries,
                })
                .await
            }
        }
        result
    }
}

fn require_items(cart: Option<Cart>, user_id: UserId) -> Result<Cart, ApiError> {
    let cart = cart.ok_or_else(|| ApiError::NotFound(format!("Cart not found for {}", user_id)))?;
    let mut errors = FieldErrors::new();
    errors.check(!cart.is_empty(), "cart", "must contain at least one item");
    errors.into_result()?;
    Ok(cart)
}

impl OrderService {
    pub fn new(
        deps: OrderDependencies,
        bus: EventBus,
        breakers: Arc<OrderBreakers>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            deps,
            bus,
            breakers,
            retry,
        }
    }

    pub fn breakers(&self) -> &OrderBreakers {
        &self.breakers
    }

    /// Runs `op` through `breaker`, retrying transient failures. Also returns how many
    /// retries it took.
    async fn guarded<T, F, Fut>(
        &self,
        breaker: &CircuitBreaker,
        operation: &str,
        op: F,
    ) -> (Result<T, ApiError>, u32)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let op = &op;
        let result = retry_with_backoff(&self.retry, operation, move || async move {
            counter.fetch_add(1, Ordering::Relaxed);
            breaker.call(op).await.map_err(ApiError::from)
        })
        .await;
        let retries = attempts.load(Ordering::Relaxed).saturating_sub(1);
        (result, retries)
    }

    /// Turns the caller's cart into a `Pending` order.
    #[instrument(skip(self, principal), fields(user = %principal.user_id))]
    pub async fn place_order(
        &self,
        principal: &Principal,
        request: PlaceOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        let user_id = principal.user_id;
        let mut errors = FieldErrors::new();
        errors.check(
            !request.delivery_address.trim().is_empty(),
            "deliveryAddress",
            "must not be blank",
        );
        errors.into_result()?;

        let saga = SagaRun::begin(&self.deps.sagas, json!({ "userId": user_id.0 })).await;

        saga.start("fetch-cart").await;
        let carts = &self.deps.carts;
        let (found, retries) = self
            .guarded(&self.breakers.cart, "fetch-cart", move || async move {
                carts.find_for_user(user_id).await.map_err(ApiError::from)
            })
            .await;
        let cart = saga
            .settle(found.and_then(|c| require_items(c, user_id)), retries, |c| {
                Some(json!({ "cartId": c.id.0, "items": c.items.len() }))
            })
            .await?;

        saga.start("check-restaurant").await;
        let restaurant_id = cart
            .restaurant_id
            .ok_or_else(|| ApiError::Internal(format!("{} has items but no restaurant", cart.id)));
        let restaurants = &self.deps.restaurants;
        let (restaurant, retries) = match restaurant_id {
            Ok(id) => {
                self.guarded(&self.breakers.restaurant, "check-restaurant", move || async move {
                    restaurants.require(id).await.map_err(ApiError::from)
                })
                .await
            }
            Err(e) => (Err(e), 0),
        };
        let restaurant = restaurant.and_then(|r| {
            if r.open {
                Ok(r)
            } else {
                Err(ApiError::InvalidOrderState(format!(
                    "Restaurant {} is not accepting orders",
                    r.name
                )))
            }
        });
        let restaurant = saga.settle(restaurant, retries, |_| None).await?;

        saga.start("charge-payment").await;
        let reference = format!("order-{}", Uuid::new_v4());
        let total = cart.total;
        let method = request.payment_method;
        let payments = &self.deps.payments;
        let reference_ref = reference.as_str();
        let (charged, retries) = self
            .guarded(&self.breakers.payment, "charge-payment", move || async move {
                payments.charge(reference_ref, user_id, total, method).await
            })
            .await;
        let payment = saga
            .settle(charged, retries, |p| Some(json!({ "paymentId": p.id.0 })))
            .await?;
        saga.record(SagaAction::RecordContext {
            key: "paymentId".to_string(),
            value: json!(payment.id.0),
        })
        .await;

        saga.start("create-order").await;
        let created = self
            .deps
            .orders
            .create_order(OrderCreate {
                user_id,
                restaurant_id: restaurant.id,
                items: cart.items.iter().map(OrderItem::from).collect(),
                delivery_address: request.delivery_address,
                payment_id: payment.id,
                payment_method: method,
            })
            .await
            .map_err(ApiError::from);
        let created = match created {
            Ok(id) => self.deps.orders.require(id).await.map_err(ApiError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = &created {
            warn!(
                payment = %payment.id,
                amount = payment.amount,
                error = %e,
                "Order not saved after payment was taken; payment is NOT refunded"
            );
        }
        let order = saga.settle(created, 0, |o| Some(json!({ "orderId": o.id.0 }))).await?;

        saga.start("clear-cart").await;
        let cleared = self.deps.carts.clear(cart.id).await.map_err(ApiError::from);
        if let Err(e) = &cleared {
            warn!(order = %order.id, cart = %cart.id, error = %e, "Cart not cleared after order was placed");
        }
        saga.settle(cleared, 0, |_| None).await?;

        saga.start("publish-order-created").await;
        self.bus.publish(order_event(
            ORDER_CREATED,
            &order,
            json!({ "paymentId": payment.id.0, "restaurantName": restaurant.name }),
        ));
        saga.settle(Ok(()), 0, |_| None).await?;
        saga.record(SagaAction::Finish).await;

        info!(order = %order.id, total = order.total_amount, "Order placed");
        Ok(OrderResponse::from(&order))
    }

    /// Orders are visible to their customer, the restaurant's owner and admins.
    async fn visible(&self, principal: &Principal, order: &Order) -> Result<(), ApiError> {
        if principal.require_self_or_admin(order.user_id).is_ok() {
            return Ok(());
        }
        if principal.role == Role::RestaurantOwner {
            let restaurant = self.deps.restaurants.require(order.restaurant_id).await?;
            if restaurant.owner_id == principal.user_id {
                return Ok(());
            }
        }
        Err(ApiError::forbidden())
    }

    async fn require_restaurant_staff(
        &self,
        principal: &Principal,
        order: &Order,
    ) -> Result<crate::model::Restaurant, ApiError> {
        let restaurant = self.deps.restaurants.require(order.restaurant_id).await?;
        if restaurant.owner_id != principal.user_id && !principal.is_admin() {
            return Err(ApiError::forbidden());
        }
        Ok(restaurant)
    }

    #[instrument(skip(self, principal))]
    pub async fn get_order(&self, principal: &Principal, id: OrderId) -> Result<OrderResponse, ApiError> {
        let order = self.deps.orders.require(id).await?;
        self.visible(principal, &order).await?;
        Ok(OrderResponse::from(&order))
    }

    /// Newest first.
    #[instrument(skip(self, principal))]
    pub async fn orders_for_user(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> Result<Vec<OrderResponse>, ApiError> {
        principal.require_self_or_admin(user_id)?;
        let orders = self.deps.orders.orders_for_user(user_id).await?;
        Ok(orders.iter().map(OrderResponse::from).collect())
    }

    /// Only a `Pending` order can be cancelled. A completed payment is refunded.
    #[instrument(skip(self, principal))]
    pub async fn cancel_order(&self, principal: &Principal, id: OrderId) -> Result<OrderResponse, ApiError> {
        let order = self.deps.orders.require(id).await?;
        principal.require_self_or_admin(order.user_id)?;
        let order = self.deps.orders.cancel(id).await?;

        let mut refunded = false;
        match self.deps.payment_records.get(order.payment_id).await {
            Ok(Some(payment)) if payment.status == PaymentStatus::Completed => {
                match self.deps.payments.refund(payment.id).await {
                    Ok(_) => refunded = true,
                    Err(e) => warn!(order = %id, payment = %payment.id, error = %e, "Refund failed"),
                }
            }
            Ok(_) => {}
            Err(e) => warn!(order = %id, error = %e, "Could not look up payment for refund"),
        }

        self.bus.publish(order_event(
            ORDER_CANCELLED,
            &order,
            json!({ "refunded": refunded, "cancelledBy": principal.user_id.0 }),
        ));
        info!(order = %id, refunded, "Order cancelled");
        Ok(OrderResponse::from(&order))
    }

    /// The restaurant accepts the order.
    #[instrument(skip(self, principal))]
    pub async fn confirm_order(&self, principal: &Principal, id: OrderId) -> Result<OrderResponse, ApiError> {
        let order = self.deps.orders.require(id).await?;
        let restaurant = self.require_restaurant_staff(principal, &order).await?;
        let order = self.deps.orders.confirm(id).await?;
        self.bus.publish(order_event(
            ORDER_CONFIRMED,
            &order,
            json!({
                "pickupAddress": restaurant.address,
                "restaurantName": restaurant.name,
            }),
        ));
        info!(order = %id, "Order confirmed");
        Ok(OrderResponse::from(&order))
    }

    /// Kitchen progress reported by the restaurant.
    #[instrument(skip(self, principal))]
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderResponse, ApiError> {
        let order = self.deps.orders.require(id).await?;
        self.require_restaurant_staff(principal, &order).await?;
        let order = self.advance(&order, status).await?;
        Ok(OrderResponse::from(&order))
    }

    async fn advance(&self, current: &Order, status: OrderStatus) -> Result<Order, ApiError> {
        let order = self.deps.orders.advance(current.id, status).await?;
        self.bus.publish(order_event(
            ORDER_STATUS_CHANGED,
            &order,
            json!({ "previousStatus": current.status }),
        ));
        if order.status == OrderStatus::Delivered {
            self.bus.publish(order_event(ORDER_DELIVERED, &order, json!({})));
        }
        info!(order = %order.id, from = %current.status, to = %order.status, "Order status changed");
        Ok(order)
    }

    /// Moves the order along after a delivery milestone. A milestone the order has
    /// already passed is ignored, so redelivered events are harmless.
    #[instrument(skip(self))]
    pub async fn apply_delivery_update(&self, id: OrderId, target: OrderStatus) -> Result<(), ApiError> {
        let order = self.deps.orders.require(id).await?;
        let already = match target {
            OrderStatus::OutForDelivery => {
                matches!(order.status, OrderStatus::OutForDelivery | OrderStatus::Delivered)
            }
            _ => order.status == target,
        };
        if already {
            return Ok(());
        }
        if order.status == OrderStatus::Cancelled {
            warn!(order = %id, %target, "Delivery update for a cancelled order ignored");
            return Ok(());
        }
        // A pickup reported before the kitchen marked the order moves it straight on.
        if target == OrderStatus::Delivered && order.status != OrderStatus::OutForDelivery {
            let order = self.advance(&order, OrderStatus::OutForDelivery).await?;
            self.advance(&order, OrderStatus::Delivered).await?;
            return Ok(());
        }
        self.advance(&order, target).await?;
        Ok(())
    }
}
