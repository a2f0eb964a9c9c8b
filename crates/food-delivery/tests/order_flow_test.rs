mod common;

use actor_framework::{ActorClient, Filter, Topic};
use common::*;
use food_delivery::error::ApiError;
use food_delivery::events::{ORDER_CANCELLED, ORDER_CREATED, PAYMENT_REFUNDED};
use food_delivery::model::{OrderStatus, PaymentStatus, Role, SagaStatus};

#[tokio::test]
async fn test_place_order_charges_cart_total_and_empties_cart() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let restaurant =
        open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5), ("Tiramisu", 5.25)]).await;

    platform
        .carts
        .add_item(&alice, restaurant.id, restaurant.menu[0].id, 2)
        .await
        .unwrap();
    platform
        .carts
        .add_item(&alice, restaurant.id, restaurant.menu[1].id, 3)
        .await
        .unwrap();

    let order = platform.orders.place_order(&alice, order_request()).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 9.5 * 2.0 + 5.25 * 3.0);
    assert_eq!(order.items.len(), 2);

    let payment = platform.clients.payments.require(order.payment_id).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, order.total_amount);

    let cart = platform.carts.get_or_create_cart(&alice).await.unwrap();
    assert!(cart.is_empty());
    assert_eq!(cart.restaurant_id, None);

    let created: Vec<_> = platform
        .bus
        .history(Topic::OrderEvents)
        .into_iter()
        .filter(|e| e.event_type == ORDER_CREATED)
        .collect();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].u64_field("orderId"), Some(order.order_id.0 as u64));

    let sagas = platform.clients.sagas.list(Filter::all()).await.unwrap();
    assert_eq!(sagas.len(), 1);
    assert_eq!(sagas[0].status, SagaStatus::Completed);
    assert_eq!(sagas[0].context["paymentId"], payment.id.0);

    platform.settle().await;
    platform.shutdown().await;
}

#[tokio::test]
async fn test_place_order_rejects_missing_empty_and_closed() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let restaurant = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5)]).await;

    let err = platform.orders.place_order(&alice, order_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "{:?}", err);

    platform.carts.get_or_create_cart(&alice).await.unwrap();
    let err = platform.orders.place_order(&alice, order_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }), "{:?}", err);

    platform
        .carts
        .add_item(&alice, restaurant.id, restaurant.menu[0].id, 1)
        .await
        .unwrap();
    platform.restaurants.set_open(&owner, restaurant.id, false).await.unwrap();
    let err = platform.orders.place_order(&alice, order_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOrderState(_)), "{:?}", err);

    let mut blank = order_request();
    blank.delivery_address = "  ".to_string();
    let err = platform.orders.place_order(&alice, blank).await.unwrap_err();
    assert_eq!(err.status(), 400);

    // Nothing was charged along the way.
    assert!(platform.clients.payments.list(Filter::all()).await.unwrap().is_empty());

    platform.settle().await;
    platform.shutdown().await;
}

#[tokio::test]
async fn test_cancel_only_pending_orders() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let bob = sign_up(&platform, "Bob", Role::Customer).await;
    let restaurant = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5)]).await;
    let item = restaurant.menu[0].id;

    platform.carts.add_item(&alice, restaurant.id, item, 1).await.unwrap();
    let first = platform.orders.place_order(&alice, order_request()).await.unwrap();

    assert_eq!(
        platform.orders.cancel_order(&bob, first.order_id).await,
        Err(ApiError::forbidden())
    );

    let cancelled = platform.orders.cancel_order(&alice, first.order_id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    let payment = platform.clients.payments.require(first.payment_id).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Refunded);
    assert!(platform
        .bus
        .history(Topic::PaymentEvents)
        .iter()
        .any(|e| e.event_type == PAYMENT_REFUNDED));
    assert!(platform
        .bus
        .history(Topic::OrderEvents)
        .iter()
        .any(|e| e.event_type == ORDER_CANCELLED));

    let again = platform.orders.cancel_order(&alice, first.order_id).await;
    assert!(matches!(again, Err(ApiError::InvalidOrderState(_))), "{:?}", again);

    platform.carts.add_item(&alice, restaurant.id, item, 1).await.unwrap();
    let second = platform.orders.place_order(&alice, order_request()).await.unwrap();
    platform.orders.confirm_order(&owner, second.order_id).await.unwrap();
    let confirmed = platform.orders.cancel_order(&alice, second.order_id).await;
    assert!(matches!(confirmed, Err(ApiError::InvalidOrderState(_))), "{:?}", confirmed);

    platform.settle().await;
    platform.shutdown().await;
}

#[tokio::test]
async fn test_kitchen_transitions_are_checked() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let other_owner = sign_up(&platform, "Luigi", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let restaurant = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5)]).await;

    platform
        .carts
        .add_item(&alice, restaurant.id, restaurant.menu[0].id, 1)
        .await
        .unwrap();
    let order = platform.orders.place_order(&alice, order_request()).await.unwrap();

    let early = platform
        .orders
        .update_status(&owner, order.order_id, OrderStatus::Preparing)
        .await;
    assert!(matches!(early, Err(ApiError::InvalidOrderState(_))), "{:?}", early);
    assert_eq!(
        platform.orders.confirm_order(&other_owner, order.order_id).await,
        Err(ApiError::forbidden())
    );
    assert_eq!(
        platform.orders.confirm_order(&alice, order.order_id).await,
        Err(ApiError::forbidden())
    );

    platform.orders.confirm_order(&owner, order.order_id).await.unwrap();
    let preparing = platform
        .orders
        .update_status(&owner, order.order_id, OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(preparing.status, OrderStatus::Preparing);

    let skipped = platform
        .orders
        .update_status(&owner, order.order_id, OrderStatus::Delivered)
        .await;
    assert!(matches!(skipped, Err(ApiError::InvalidOrderState(_))), "{:?}", skipped);

    // The owner can see the order; a stranger cannot.
    assert!(platform.orders.get_order(&owner, order.order_id).await.is_ok());
    assert_eq!(
        platform.orders.get_order(&other_owner, order.order_id).await,
        Err(ApiError::forbidden())
    );

    platform.settle().await;
    platform.shutdown().await;
}

#[tokio::test]
async fn test_full_flow_through_delivery() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let courier = sign_up(&platform, "Dana", Role::Driver).await;
    let restaurant = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5)]).await;
    on_shift_driver(&platform, &courier).await;

    platform
        .carts
        .add_item(&alice, restaurant.id, restaurant.menu[0].id, 2)
        .await
        .unwrap();
    let order = platform.orders.place_order(&alice, order_request()).await.unwrap();
    platform.orders.confirm_order(&owner, order.order_id).await.unwrap();
    platform.settle().await;

    let delivery = platform
        .deliveries
        .delivery_for_order(&alice, order.order_id)
        .await
        .unwrap();
    assert!(delivery.driver_id.is_some());
    assert_eq!(delivery.pickup_address, restaurant.address);
    assert_eq!(delivery.dropoff_address, "7 Elm Street");

    // Only the assigned driver moves it along.
    assert_eq!(
        platform.deliveries.mark_picked_up(&alice, delivery.id).await,
        Err(ApiError::forbidden())
    );
    platform.deliveries.mark_picked_up(&courier, delivery.id).await.unwrap();
    platform.settle().await;
    let order_now = platform.orders.get_order(&alice, order.order_id).await.unwrap();
    assert_eq!(order_now.status, OrderStatus::OutForDelivery);

    platform.deliveries.mark_delivered(&courier, delivery.id).await.unwrap();
    platform.settle().await;
    let order_now = platform.orders.get_order(&alice, order.order_id).await.unwrap();
    assert_eq!(order_now.status, OrderStatus::Delivered);

    let driver = platform
        .clients
        .drivers
        .require(delivery.driver_id.unwrap())
        .await
        .unwrap();
    assert!(driver.available);
    assert_eq!(driver.completed_deliveries, 1);

    let templates: Vec<String> = platform
        .notifications
        .for_user(&alice, alice.user_id)
        .await
        .unwrap()
        .into_iter()
        .rev()
        .map(|n| n.template)
        .collect();
    assert_eq!(
        templates,
        vec![
            "welcome-email",
            "order-placed-email",
            "order-confirmed-email",
            "order-confirmed-push",
            "driver-assigned-push",
            "order-delivered-push",
        ]
    );
    assert!(platform.bus.dead_letters().is_empty());

    platform.shutdown().await;
}

#[tokio::test]
async fn test_no_driver_leaves_delivery_pending() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let restaurant = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5)]).await;

    platform
        .carts
        .add_item(&alice, restaurant.id, restaurant.menu[0].id, 1)
        .await
        .unwrap();
    let order = platform.orders.place_order(&alice, order_request()).await.unwrap();
    platform.orders.confirm_order(&owner, order.order_id).await.unwrap();
    platform.settle().await;

    let delivery = platform
        .deliveries
        .delivery_for_order(&alice, order.order_id)
        .await
        .unwrap();
    assert_eq!(delivery.status, food_delivery::model::DeliveryStatus::Pending);
    assert_eq!(delivery.driver_id, None);
    assert!(platform.bus.dead_letters().is_empty());

    platform.shutdown().await;
}
