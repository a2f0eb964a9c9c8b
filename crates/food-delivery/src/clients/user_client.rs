//! # User Client
//!
//! High-level API for the `User` actor.
use crate::model::{normalize_email, Role, User, UserCreate, UserId, UserUpdate};
use crate::user_actor::{UserAction, UserError};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    /// Fails with [`UserError::EmailTaken`] when the email is already registered.
    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        let email = normalize_email(email);
        let mut matches = self
            .list(Filter::new(move |u: &User| u.email == email))
            .await?;
        Ok(matches.pop())
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn perform(&self, id: UserId, action: UserAction) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    pub async fn deactivate(&self, id: UserId) -> Result<User, UserError> {
        self.perform(id, UserAction::Deactivate).await
    }

    pub async fn change_role(&self, id: UserId, role: Role) -> Result<User, UserError> {
        self.perform(id, UserAction::ChangeRole(role)).await
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<UserError>() {
            Ok(typed) => typed,
            Err(FrameworkError::Conflict(email)) => UserError::EmailTaken(email),
            Err(FrameworkError::NotFound(id)) => UserError::NotFound(id),
            Err(other) => UserError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &UserId) -> Self::Error {
        UserError::NotFound(id.to_string())
    }
}
