//! A user's notification inbox.

use crate::auth::Principal;
use crate::clients::NotificationClient;
use crate::error::ApiError;
use crate::model::{Notification, NotificationId, UserId};
use actor_framework::ActorClient;
use tracing::instrument;

#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationClient,
}

impl NotificationService {
    pub fn new(notifications: NotificationClient) -> Self {
        Self { notifications }
    }

    /// Newest first.
    #[instrument(skip(self, principal))]
    pub async fn for_user(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> Result<Vec<Notification>, ApiError> {
        principal.require_self_or_admin(user_id)?;
        Ok(self.notifications.for_user(user_id).await?)
    }

    #[instrument(skip(self, principal))]
    pub async fn unread_count(&self, principal: &Principal, user_id: UserId) -> Result<usize, ApiError> {
        let all = self.for_user(principal, user_id).await?;
        Ok(all.iter().filter(|n| !n.read).count())
    }

    #[instrument(skip(self, principal))]
    pub async fn mark_read(
        &self,
        principal: &Principal,
        id: NotificationId,
    ) -> Result<Notification, ApiError> {
        let notification = self.notifications.require(id).await?;
        principal.require_self_or_admin(notification.user_id)?;
        Ok(self.notifications.mark_read(id).await?)
    }
}
