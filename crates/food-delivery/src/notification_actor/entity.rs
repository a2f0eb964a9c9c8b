//! [`ActorEntity`] implementation for [`Notification`].

use super::{NotificationAction, NotificationError, NotificationSender};
use crate::model::{Notification, NotificationCreate, NotificationId, NotificationStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

#[async_trait]
impl ActorEntity for Notification {
    type Id = NotificationId;
    type Create = NotificationCreate;
    type Update = ();
    type Action = NotificationAction;
    type ActionResult = Notification;
    type Context = Arc<dyn NotificationSender>;
    type Error = NotificationError;

    fn from_create_params(
        id: NotificationId,
        params: NotificationCreate,
    ) -> Result<Self, Self::Error> {
        if params.recipient.trim().is_empty() {
            return Err(NotificationError::ValidationError("recipient is required".into()));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            channel: params.channel,
            template: params.template,
            recipient: params.recipient,
            subject: params.subject,
            body: params.body,
            status: NotificationStatus::Pending,
            read: false,
            source_event_id: params.source_event_id,
            error: None,
            created_at: Utc::now(),
            sent_at: None,
        })
    }

    fn unique_key(&self) -> Option<String> {
        self.source_event_id
            .map(|event_id| format!("{}:{}", event_id, self.template))
    }

    /// A failed send is stored as `Failed`; it does not abort the create.
    async fn on_create(&mut self, sender: &Arc<dyn NotificationSender>) -> Result<(), Self::Error> {
        match sender.send(self).await {
            Ok(()) => {
                self.status = NotificationStatus::Sent;
                self.sent_at = Some(Utc::now());
            }
            Err(e) => {
                warn!(notification = %self.id, template = %self.template, error = %e, "Delivery failed");
                self.status = NotificationStatus::Failed;
                self.error = Some(e.to_string());
            }
        }
        Ok(())
    }

    async fn on_update(
        &mut self,
        _update: (),
        _ctx: &Arc<dyn NotificationSender>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: NotificationAction,
        _ctx: &Arc<dyn NotificationSender>,
    ) -> Result<Notification, Self::Error> {
        match action {
            NotificationAction::MarkRead => self.read = true,
        }
        Ok(self.clone())
    }
}
