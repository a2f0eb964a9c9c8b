//! Profile reads and writes, with profiles cached per user id.

use crate::auth::Principal;
use crate::clients::UserClient;
use crate::error::ApiError;
use crate::model::{ProfilePatch, ProfileReplace, Role, UserId, UserProfile, UserUpdate};
use actor_framework::{ActorClient, CacheAside};
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct UserService {
    users: UserClient,
    profiles: CacheAside<UserId, UserProfile>,
}

impl UserService {
    pub fn new(users: UserClient, profile_ttl: Duration) -> Self {
        Self {
            users,
            profiles: CacheAside::new("user-profiles", profile_ttl),
        }
    }

    pub fn cache(&self) -> &CacheAside<UserId, UserProfile> {
        &self.profiles
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, ApiError> {
        self.profiles
            .get_or_load(user_id, || async {
                let user = self.users.require(user_id).await?;
                Ok::<_, ApiError>(UserProfile::from(&user))
            })
            .await
    }

    /// Full replacement of the mutable profile fields.
    #[instrument(skip(self, principal))]
    pub async fn update_profile(
        &self,
        principal: &Principal,
        user_id: UserId,
        profile: ProfileReplace,
    ) -> Result<UserProfile, ApiError> {
        self.apply(principal, user_id, UserUpdate::Replace(profile)).await
    }

    /// Changes only the fields present.
    #[instrument(skip(self, principal))]
    pub async fn patch_profile(
        &self,
        principal: &Principal,
        user_id: UserId,
        patch: ProfilePatch,
    ) -> Result<UserProfile, ApiError> {
        self.apply(principal, user_id, UserUpdate::Patch(patch)).await
    }

    async fn apply(
        &self,
        principal: &Principal,
        user_id: UserId,
        update: UserUpdate,
    ) -> Result<UserProfile, ApiError> {
        principal.require_self_or_admin(user_id)?;
        let user = self.users.update_user(user_id, update).await?;
        self.profiles.evict(&user_id).await;
        Ok(UserProfile::from(&user))
    }

    #[instrument(skip(self, principal))]
    pub async fn deactivate(&self, principal: &Principal, user_id: UserId) -> Result<UserProfile, ApiError> {
        principal.require_self_or_admin(user_id)?;
        let user = self.users.deactivate(user_id).await?;
        self.profiles.evict(&user_id).await;
        info!(user = %user_id, by = %principal.user_id, "User deactivated");
        Ok(UserProfile::from(&user))
    }

    #[instrument(skip(self, principal))]
    pub async fn change_role(
        &self,
        principal: &Principal,
        user_id: UserId,
        role: Role,
    ) -> Result<UserProfile, ApiError> {
        principal.require_role(Role::Admin)?;
        let user = self.users.change_role(user_id, role).await?;
        self.profiles.evict(&user_id).await;
        Ok(UserProfile::from(&user))
    }
}
