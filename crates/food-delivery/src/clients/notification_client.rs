//! # Notification Client
use crate::model::{Notification, NotificationCreate, NotificationId, UserId};
use crate::notification_actor::{NotificationAction, NotificationError};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

impl NotificationClient {
    pub fn new(inner: ResourceClient<Notification>) -> Self {
        Self { inner }
    }

    /// Stores and dispatches. A repeat of the same event and template fails with
    /// [`NotificationError::Duplicate`].
    #[instrument(skip(self))]
    pub async fn send(&self, params: NotificationCreate) -> Result<NotificationId, NotificationError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<Notification>, NotificationError> {
        let mut found = self
            .list(Filter::new(move |n: &Notification| n.user_id == user_id))
            .await?;
        found.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(found)
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: NotificationId) -> Result<Notification, NotificationError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, NotificationAction::MarkRead)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Notification> for NotificationClient {
    type Error = NotificationError;

    fn inner(&self) -> &ResourceClient<Notification> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<NotificationError>() {
            Ok(typed) => typed,
            Err(FrameworkError::Conflict(key)) => NotificationError::Duplicate(key),
            Err(FrameworkError::NotFound(id)) => NotificationError::NotFound(id),
            Err(other) => NotificationError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &NotificationId) -> Self::Error {
        NotificationError::NotFound(id.to_string())
    }
}
