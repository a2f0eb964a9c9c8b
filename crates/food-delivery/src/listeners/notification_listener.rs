//! Turns user, order and delivery events into email and push notifications.
//!
//! | event | notifications |
//! |---|---|
//! | `USER_REGISTERED` | email `welcome-email` |
//! | `ORDER_CREATED` | email `order-placed-email` |
//! | `ORDER_CONFIRMED` | email `order-confirmed-email`, push `order-confirmed-push` |
//! | `ORDER_CANCELLED` | email `order-cancelled-email`, push `order-cancelled-push` |
//! | `DELIVERY_ASSIGNED` | push `driver-assigned-push` |
//! | `ORDER_DELIVERED` | push `order-delivered-push` |
//!
//! Anything else is skipped. Notifications carry the event id, and the notification
//! actor refuses a second one for the same event and template, so a redelivered event
//! sends nothing new.

use super::id_field;
use crate::clients::{NotificationClient, UserClient};
use crate::events::{
    DELIVERY_ASSIGNED, ORDER_CANCELLED, ORDER_CONFIRMED, ORDER_CREATED, ORDER_DELIVERED,
    USER_REGISTERED,
};
use crate::model::{Channel, NotificationCreate, User, UserId};
use crate::notification_actor::NotificationError;
use actor_framework::{ActorClient, DomainEvent, EventHandler, HandlerError};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// One notification to send for an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub channel: Channel,
    pub name: &'static str,
    pub subject: String,
    pub body: String,
}

fn email(name: &'static str, subject: String, body: String) -> Template {
    Template {
        channel: Channel::Email,
        name,
        subject,
        body,
    }
}

fn push(name: &'static str, subject: String, body: String) -> Template {
    Template {
        channel: Channel::Push,
        name,
        subject,
        body,
    }
}

/// What to send for `event`; empty for events nobody is told about.
pub fn templates_for(event: &DomainEvent) -> Vec<Template> {
    let order = event.u64_field("orderId").unwrap_or_default();
    let restaurant = event.str_field("restaurantName").unwrap_or("the restaurant");
    match event.event_type.as_str() {
        USER_REGISTERED => {
            let name = event.str_field("name").unwrap_or("there");
            vec![email(
                "welcome-email",
                "Welcome aboard".to_string(),
                format!("Hi {}, your account is ready. Hungry?", name),
            )]
        }
        ORDER_CREATED => {
            let total = event
                .payload
                .get("totalAmount")
                .and_then(|v| v.as_f64())
                .unwrap_or_default();
            vec![email(
                "order-placed-email",
                format!("Order #{} received", order),
                format!("We've sent order #{} to {}. Total charged: {:.2}.", order, restaurant, total),
            )]
        }
        ORDER_CONFIRMED => vec![
            email(
                "order-confirmed-email",
                format!("Order #{} confirmed", order),
                format!("{} has accepted order #{} and is preparing it.", restaurant, order),
            ),
            push(
                "order-confirmed-push",
                "Order confirmed".to_string(),
                format!("{} is preparing order #{}.", restaurant, order),
            ),
        ],
        ORDER_CANCELLED => vec![
            email(
                "order-cancelled-email",
                format!("Order #{} cancelled", order),
                format!("Order #{} was cancelled. Any payment taken will be refunded.", order),
            ),
            push(
                "order-cancelled-push",
                "Order cancelled".to_string(),
                format!("Order #{} was cancelled.", order),
            ),
        ],
        DELIVERY_ASSIGNED => vec![push(
            "driver-assigned-push",
            "Driver on the way".to_string(),
            format!("A driver has been assigned to order #{}.", order),
        )],
        ORDER_DELIVERED => vec![push(
            "order-delivered-push",
            "Delivered".to_string(),
            format!("Order #{} has been delivered. Enjoy!", order),
        )],
        _ => Vec::new(),
    }
}

fn recipient(channel: Channel, user: &User) -> String {
    match channel {
        Channel::Email => user.email.clone(),
        Channel::Push => format!("device:{}", user.id),
        Channel::Sms => user.phone.clone().unwrap_or_default(),
    }
}

pub struct NotificationListener {
    notifications: NotificationClient,
    users: UserClient,
}

impl NotificationListener {
    pub fn new(notifications: NotificationClient, users: UserClient) -> Self {
        Self {
            notifications,
            users,
        }
    }
}

#[async_trait]
impl EventHandler for NotificationListener {
    fn name(&self) -> &str {
        "notification-service"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        let templates = templates_for(event);
        if templates.is_empty() {
            debug!(event_type = %event.event_type, "No notification for event");
            return Ok(());
        }
        let user_id = UserId(id_field(event, "userId")?);
        let Some(user) = self.users.get(user_id).await? else {
            warn!(user = %user_id, event_type = %event.event_type, "Recipient not found, skipping");
            return Ok(());
        };

        for template in templates {
            let sent = self
                .notifications
                .send(NotificationCreate {
                    user_id,
                    channel: template.channel,
                    template: template.name.to_string(),
                    recipient: recipient(template.channel, &user),
                    subject: template.subject,
                    body: template.body,
                    source_event_id: Some(event.event_id),
                })
                .await;
            match sent {
                Ok(id) => info!(notification = %id, user = %user_id, template = template.name, "Notification recorded"),
                Err(NotificationError::Duplicate(_)) => {
                    debug!(template = template.name, event_id = %event.event_id, "Already notified")
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::Topic;
    use serde_json::json;

    #[test]
    fn test_confirmed_order_gives_email_and_push() {
        let event = DomainEvent::new(
            Topic::OrderEvents,
            ORDER_CONFIRMED,
            9,
            json!({ "orderId": 9, "userId": 1, "restaurantName": "Trattoria" }),
        );
        let templates = templates_for(&event);
        let names: Vec<_> = templates.iter().map(|t| (t.channel, t.name)).collect();
        assert_eq!(
            names,
            vec![
                (Channel::Email, "order-confirmed-email"),
                (Channel::Push, "order-confirmed-push")
            ]
        );
        assert!(templates[0].body.contains("Trattoria"));
    }

    #[test]
    fn test_unmapped_events_have_no_templates() {
        let event = DomainEvent::new(Topic::OrderEvents, "ORDER_STATUS_CHANGED", 9, json!({}));
        assert!(templates_for(&event).is_empty());
        let event = DomainEvent::new(Topic::PaymentEvents, "PAYMENT_COMPLETED", 9, json!({}));
        assert!(templates_for(&event).is_empty());
    }
}
