//! Runs one order end to end against an in-process platform: sign-ups, a restaurant
//! with a menu, a cart, placement, confirmation, delivery and the notifications that
//! fall out of it.

use actor_framework::tracing::setup_tracing;
use food_delivery::auth::{Principal, RegisterRequest};
use food_delivery::config::AppConfig;
use food_delivery::error::ApiError;
use food_delivery::lifecycle::DeliveryPlatform;
use food_delivery::model::{
    DriverCreate, MenuItemCreate, PaymentMethod, PlaceOrderRequest, RestaurantCreate, Role, UserId,
};
use tracing::{error, info, Instrument};

async fn sign_up(
    platform: &DeliveryPlatform,
    name: &str,
    email: &str,
    role: Role,
) -> Result<Principal, ApiError> {
    let session = platform
        .auth
        .register(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "correct-horse-battery".to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
            role: Some(role),
        })
        .await?;
    platform
        .auth
        .authenticate(&format!("Bearer {}", session.access_token))
}

async fn run(platform: &DeliveryPlatform) -> Result<(), ApiError> {
    let owner = sign_up(platform, "Marco", "marco@trattoria.example", Role::RestaurantOwner).await?;
    let customer = sign_up(platform, "Alice", "alice@example.com", Role::Customer).await?;
    let courier = sign_up(platform, "Dana", "dana@example.com", Role::Driver).await?;

    let restaurant = async {
        let restaurant = platform
            .restaurants
            .create_restaurant(
                &owner,
                RestaurantCreate {
                    owner_id: owner.user_id,
                    name: "Trattoria Roma".to_string(),
                    cuisine: "Italian".to_string(),
                    address: "2 Via Roma".to_string(),
                },
            )
            .await?;
        for (name, price) in [("Margherita", 9.5), ("Tiramisu", 5.0)] {
            platform
                .restaurants
                .add_menu_item(
                    &owner,
                    restaurant.id,
                    MenuItemCreate {
                        name: name.to_string(),
                        description: String::new(),
                        price,
                        category: "menu".to_string(),
                    },
                )
                .await?;
        }
        platform.restaurants.set_open(&owner, restaurant.id, true).await
    }
    .instrument(tracing::info_span!("restaurant_setup"))
    .await?;
    info!(restaurant = %restaurant.id, "Restaurant open");

    let driver = platform
        .deliveries
        .register_driver(
            &courier,
            DriverCreate {
                user_id: UserId(0),
                name: "Dana".to_string(),
                phone: "555-0101".to_string(),
                vehicle: "scooter".to_string(),
            },
        )
        .await?;
    platform
        .deliveries
        .set_availability(&courier, driver.id, true)
        .await?;

    let order = async {
        for (item, quantity) in restaurant.menu.iter().zip([2, 1]) {
            platform
                .carts
                .add_item(&customer, restaurant.id, item.id, quantity)
                .await?;
        }
        platform
            .orders
            .place_order(
                &customer,
                PlaceOrderRequest {
                    delivery_address: "7 Elm Street".to_string(),
                    payment_method: PaymentMethod::CreditCard,
                },
            )
            .await
    }
    .instrument(tracing::info_span!("order_placement"))
    .await?;
    info!(order = %order.order_id, total = order.total_amount, "Order placed");

    platform.orders.confirm_order(&owner, order.order_id).await?;
    platform.settle().await;

    let delivery = platform
        .deliveries
        .delivery_for_order(&customer, order.order_id)
        .await?;
    platform.deliveries.mark_picked_up(&courier, delivery.id).await?;
    platform.deliveries.mark_delivered(&courier, delivery.id).await?;
    platform.settle().await;

    let order = platform.orders.get_order(&customer, order.order_id).await?;
    let inbox = platform
        .notifications
        .for_user(&customer, customer.user_id)
        .await?;
    info!(
        order = %order.order_id,
        status = %order.status,
        notifications = inbox.len(),
        "Order finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;
    setup_tracing(&config.logging.filter, config.logging.json);

    info!("Starting food delivery platform");
    let platform = DeliveryPlatform::new(&config);

    let outcome = run(&platform).await;
    if let Err(e) = &outcome {
        error!(error = %e, status = e.status(), "Demo flow failed");
    }
    let dead_letters = platform.bus.dead_letters();
    if !dead_letters.is_empty() {
        error!(count = dead_letters.len(), "Events were dead-lettered");
    }

    platform.shutdown().await;
    outcome?;
    Ok(())
}
