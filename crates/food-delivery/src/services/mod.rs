//! Use-case services: authorization, caching, resilience and event publishing on top
//! of the actor clients.

pub mod cart_service;
pub mod delivery_service;
pub mod notification_service;
pub mod order_service;
pub mod payment_service;
pub mod restaurant_service;
pub mod user_service;

pub use cart_service::CartService;
pub use delivery_service::DeliveryService;
pub use notification_service::NotificationService;
pub use order_service::{OrderBreakers, OrderDependencies, OrderService, PLACE_ORDER_SAGA};
pub use payment_service::PaymentService;
pub use restaurant_service::RestaurantService;
pub use user_service::UserService;
