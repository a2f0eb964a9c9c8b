//! Outbound channels (mail relay, push provider, SMS gateway).

use crate::model::{Channel, Notification};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("send failed: {0}")]
pub struct SendError(pub String);

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), SendError>;
}

/// Writes each notification to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSender;

#[async_trait]
impl NotificationSender for LoggingSender {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        let channel = match notification.channel {
            Channel::Email => "email",
            Channel::Push => "push",
            Channel::Sms => "sms",
        };
        info!(
            channel,
            recipient = %notification.recipient,
            template = %notification.template,
            subject = %notification.subject,
            "Notification sent"
        );
        Ok(())
    }
}
