//! [`ActorEntity`] implementation for [`User`].

use super::{UserAction, UserError};
use crate::model::{normalize_email, User, UserCreate, UserId, UserUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

fn require_name(name: &str) -> Result<(), UserError> {
    if name.trim().is_empty() {
        return Err(UserError::ValidationError("name must not be blank".into()));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = User;
    type Context = ();
    type Error = UserError;

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        require_name(&params.name)?;
        let email = normalize_email(&params.email);
        if !email.contains('@') {
            return Err(UserError::ValidationError(format!(
                "invalid email '{}'",
                params.email
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            email,
            password_hash: params.password_hash,
            phone: params.phone,
            address: params.address,
            role: params.role,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(normalize_email(&self.email))
    }

    /// Applies a PUT (every mutable field replaced) or a PATCH (only the fields given).
    /// Email, password and role are not profile fields.
    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if !self.active {
            return Err(UserError::Inactive(self.id.to_string()));
        }
        match update {
            UserUpdate::Replace(profile) => {
                require_name(&profile.name)?;
                self.name = profile.name.trim().to_string();
                self.phone = profile.phone;
                self.address = profile.address;
            }
            UserUpdate::Patch(patch) => {
                if let Some(name) = patch.name {
                    require_name(&name)?;
                    self.name = name.trim().to_string();
                }
                if let Some(phone) = patch.phone {
                    self.phone = Some(phone);
                }
                if let Some(address) = patch.address {
                    self.address = Some(address);
                }
            }
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(&mut self, action: UserAction, _ctx: &()) -> Result<User, Self::Error> {
        match action {
            UserAction::Deactivate => self.active = false,
            UserAction::Reactivate => self.active = true,
            UserAction::ChangeRole(role) => self.role = role,
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfilePatch, ProfileReplace, Role};

    fn alice() -> User {
        User::from_create_params(
            UserId(1),
            UserCreate {
                name: " Alice ".into(),
                email: "Alice@Example.com".into(),
                password_hash: "hash".into(),
                phone: Some("555-0100".into()),
                address: Some("1 Main St".into()),
                role: Role::Customer,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_normalizes_email_and_name() {
        let user = alice();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.unique_key().as_deref(), Some("alice@example.com"));
        assert!(user.active);
    }

    #[tokio::test]
    async fn test_replace_clears_missing_fields_but_patch_keeps_them() {
        let mut user = alice();
        user.on_update(
            UserUpdate::Patch(ProfilePatch {
                phone: Some("555-0199".into()),
                ..Default::default()
            }),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(user.phone.as_deref(), Some("555-0199"));
        assert_eq!(user.address.as_deref(), Some("1 Main St"));

        user.on_update(
            UserUpdate::Replace(ProfileReplace {
                name: "Alicia".into(),
                phone: None,
                address: None,
            }),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(user.name, "Alicia");
        assert!(user.phone.is_none());
        assert!(user.address.is_none());
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_change_profile() {
        let mut user = alice();
        user.handle_action(UserAction::Deactivate, &()).await.unwrap();
        let result = user
            .on_update(UserUpdate::Patch(ProfilePatch::default()), &())
            .await;
        assert!(matches!(result, Err(UserError::Inactive(_))));
    }
}
