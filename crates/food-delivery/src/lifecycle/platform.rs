use crate::auth::{AuthService, JwtCodec};
use crate::clients::{
    CartClient, DeliveryClient, DriverClient, NotificationClient, OrderClient, PaymentClient,
    RestaurantClient, SagaLogClient, UserClient,
};
use crate::config::AppConfig;
use crate::listeners::{DeliveryListener, NotificationListener, OrderListener};
use crate::notification_actor::{LoggingSender, NotificationSender};
use crate::payment_actor::{PaymentGateway, SimulatedGateway};
use crate::services::{
    CartService, DeliveryService, NotificationService, OrderBreakers, OrderDependencies,
    OrderService, PaymentService, RestaurantService, UserService,
};
use crate::{
    cart_actor, delivery_actor, driver_actor, notification_actor, order_actor, payment_actor,
    restaurant_actor, saga_actor, user_actor,
};
use actor_framework::{EventBus, EventConsumer, Topic};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Raw actor clients, for wiring and for tests that inspect state directly.
#[derive(Clone)]
pub struct PlatformClients {
    pub users: UserClient,
    pub restaurants: RestaurantClient,
    pub carts: CartClient,
    pub orders: OrderClient,
    pub payments: PaymentClient,
    pub drivers: DriverClient,
    pub deliveries: DeliveryClient,
    pub notifications: NotificationClient,
    pub sagas: SagaLogClient,
}

/// Every actor, consumer and service of the platform, running.
pub struct DeliveryPlatform {
    pub auth: AuthService,
    pub users: UserService,
    pub restaurants: RestaurantService,
    pub carts: CartService,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub deliveries: DeliveryService,
    pub notifications: NotificationService,
    pub clients: PlatformClients,
    pub bus: EventBus,
    actor_handles: Vec<JoinHandle<()>>,
    consumer_handles: Vec<JoinHandle<()>>,
}

impl DeliveryPlatform {
    /// Starts the platform with the simulated payment gateway and log-only sender.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_dependencies(config, Arc::new(SimulatedGateway), Arc::new(LoggingSender))
    }

    /// Starts the platform with the given outbound integrations.
    pub fn with_dependencies(
        config: &AppConfig,
        gateway: Arc<dyn PaymentGateway>,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        let buffer = config.actors.buffer_size;

        // 1. Actors and their clients
        let (user_actor, users) = user_actor::new(buffer);
        let (restaurant_actor, restaurants) = restaurant_actor::new(buffer);
        let (cart_actor, carts) = cart_actor::new(buffer);
        let (order_actor, orders) = order_actor::new(buffer);
        let (payment_actor, payments) = payment_actor::new(buffer);
        let (driver_actor, drivers) = driver_actor::new(buffer);
        let (delivery_actor, deliveries) = delivery_actor::new(buffer);
        let (notification_actor, notifications) = notification_actor::new(buffer);
        let (saga_actor, sagas) = saga_actor::new(buffer);

        // 2. Start them with their contexts
        let actor_handles = vec![
            tokio::spawn(user_actor.run(())),
            tokio::spawn(restaurant_actor.run(())),
            tokio::spawn(cart_actor.run(restaurants.clone())),
            tokio::spawn(order_actor.run(())),
            tokio::spawn(payment_actor.run(gateway)),
            tokio::spawn(driver_actor.run(())),
            tokio::spawn(delivery_actor.run(())),
            tokio::spawn(notification_actor.run(sender)),
            tokio::spawn(saga_actor.run(())),
        ];

        // 3. Services
        let bus = EventBus::with_history_limit(config.events.history_limit);
        let jwt = Arc::new(JwtCodec::new(&config.auth));
        let payment_service = PaymentService::new(payments.clone(), bus.clone());
        let order_service = OrderService::new(
            OrderDependencies {
                orders: orders.clone(),
                carts: carts.clone(),
                restaurants: restaurants.clone(),
                payment_records: payments.clone(),
                payments: payment_service.clone(),
                sagas: sagas.clone(),
            },
            bus.clone(),
            Arc::new(OrderBreakers::new(&config.resilience)),
            config.resilience.retry.policy(),
        );
        let delivery_service = DeliveryService::new(deliveries.clone(), drivers.clone(), bus.clone());

        // 4. Consumers
        let consumer_retry = config.events.consumer_retry.policy();
        let consumer_handles = vec![
            tokio::spawn(
                EventConsumer::new(
                    &bus,
                    &[Topic::UserEvents, Topic::OrderEvents, Topic::DeliveryEvents],
                    NotificationListener::new(notifications.clone(), users.clone()),
                    consumer_retry.clone(),
                )
                .run(),
            ),
            tokio::spawn(
                EventConsumer::new(
                    &bus,
                    &[Topic::OrderEvents],
                    DeliveryListener::new(delivery_service.clone()),
                    consumer_retry.clone(),
                )
                .run(),
            ),
            tokio::spawn(
                EventConsumer::new(
                    &bus,
                    &[Topic::DeliveryEvents],
                    OrderListener::new(order_service.clone()),
                    consumer_retry,
                )
                .run(),
            ),
        ];

        info!(
            actors = actor_handles.len(),
            consumers = consumer_handles.len(),
            "Delivery platform started"
        );

        Self {
            auth: AuthService::new(users.clone(), jwt, bus.clone(), config.auth.bcrypt_cost),
            users: UserService::new(users.clone(), config.cache.user_profile_ttl()),
            restaurants: RestaurantService::new(restaurants.clone(), config.cache.restaurant_ttl()),
            carts: CartService::new(carts.clone()),
            orders: order_service,
            payments: payment_service,
            deliveries: delivery_service,
            notifications: NotificationService::new(notifications.clone()),
            clients: PlatformClients {
                users,
                restaurants,
                carts,
                orders,
                payments,
                drivers,
                deliveries,
                notifications,
                sagas,
            },
            bus,
            actor_handles,
            consumer_handles,
        }
    }

    /// Waits until every published event has been handled (or dead-lettered).
    pub async fn settle(&self) {
        self.bus.settle().await;
    }

    /// Stops consumers first so no handler is cut off mid-event, then the actors.
    pub async fn shutdown(self) {
        info!("Shutting down delivery platform");
        let DeliveryPlatform {
            auth,
            users,
            restaurants,
            carts,
            orders,
            payments,
            deliveries,
            notifications,
            clients,
            bus,
            actor_handles,
            consumer_handles,
        } = self;

        bus.close();
        for handle in consumer_handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Consumer task failed");
            }
        }

        // Actors stop once the last client for them is gone.
        drop((auth, users, restaurants, carts, orders, payments, deliveries, notifications));
        drop(clients);
        for handle in actor_handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Actor task failed");
            }
        }
        info!("Delivery platform stopped");
    }
}
