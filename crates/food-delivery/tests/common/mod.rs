#![allow(dead_code)]

use food_delivery::auth::{Principal, RegisterRequest};
use food_delivery::config::AppConfig;
use food_delivery::lifecycle::DeliveryPlatform;
use food_delivery::model::{
    DriverCreate, MenuItemCreate, PaymentMethod, PlaceOrderRequest, Restaurant, RestaurantCreate,
    Role, UserId,
};

/// Cheap hashing and millisecond backoffs.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.bcrypt_cost = 4;
    config.resilience.retry.initial_backoff_ms = 1;
    config.resilience.retry.max_backoff_ms = 5;
    config.events.consumer_retry.initial_backoff_ms = 1;
    config.events.consumer_retry.max_backoff_ms = 5;
    config
}

pub fn platform() -> DeliveryPlatform {
    actor_framework::tracing::setup_test_tracing();
    DeliveryPlatform::new(&test_config())
}

pub async fn sign_up(platform: &DeliveryPlatform, name: &str, role: Role) -> Principal {
    let session = platform
        .auth
        .register(RegisterRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password: "long-enough-password".to_string(),
            phone: Some("555-0100".to_string()),
            address: Some("7 Elm Street".to_string()),
            role: Some(role),
        })
        .await
        .expect("register");
    platform
        .auth
        .authenticate(&format!("Bearer {}", session.access_token))
        .expect("authenticate")
}

pub fn admin() -> Principal {
    Principal {
        user_id: UserId(9_999),
        email: "ops@example.com".to_string(),
        role: Role::Admin,
    }
}

/// An open restaurant owned by `owner` with one menu item per `(name, price)`.
pub async fn open_restaurant(
    platform: &DeliveryPlatform,
    owner: &Principal,
    name: &str,
    menu: &[(&str, f64)],
) -> Restaurant {
    let restaurant = platform
        .restaurants
        .create_restaurant(
            owner,
            RestaurantCreate {
                owner_id: owner.user_id,
                name: name.to_string(),
                cuisine: "Italian".to_string(),
                address: format!("1 {} Street", name),
            },
        )
        .await
        .expect("create restaurant");
    for (item, price) in menu {
        platform
            .restaurants
            .add_menu_item(
                owner,
                restaurant.id,
                MenuItemCreate {
                    name: item.to_string(),
                    description: String::new(),
                    price: *price,
                    category: "mains".to_string(),
                },
            )
            .await
            .expect("add menu item");
    }
    platform
        .restaurants
        .set_open(owner, restaurant.id, true)
        .await
        .expect("open restaurant")
}

pub async fn on_shift_driver(platform: &DeliveryPlatform, courier: &Principal) {
    let driver = platform
        .deliveries
        .register_driver(
            courier,
            DriverCreate {
                user_id: courier.user_id,
                name: "Dana".to_string(),
                phone: "555-0101".to_string(),
                vehicle: "bike".to_string(),
            },
        )
        .await
        .expect("register driver");
    platform
        .deliveries
        .set_availability(courier, driver.id, true)
        .await
        .expect("go on shift");
}

pub fn order_request() -> PlaceOrderRequest {
    PlaceOrderRequest {
        delivery_address: "7 Elm Street".to_string(),
        payment_method: PaymentMethod::CreditCard,
    }
}
