//! Account registration and token handling.

use super::password::{hash_password, verify_password};
use super::{JwtCodec, Principal, TokenKind};
use crate::clients::UserClient;
use crate::error::{ApiError, FieldErrors};
use crate::events::{user_event, USER_REGISTERED};
use crate::model::{Role, User, UserCreate, UserId, UserProfile};
use crate::user_actor::UserError;
use actor_framework::{ActorClient, EventBus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Defaults to `Customer`. `Admin` cannot be self-assigned.
    #[serde(default)]
    pub role: Option<Role>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: UserProfile,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserClient,
    jwt: Arc<JwtCodec>,
    bus: EventBus,
    bcrypt_cost: u32,
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

impl AuthService {
    pub fn new(users: UserClient, jwt: Arc<JwtCodec>, bus: EventBus, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt,
            bus,
            bcrypt_cost,
        }
    }

    fn tokens_for(&self, user: &User) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            access_token: self.jwt.issue(user, TokenKind::Access)?,
            refresh_token: self.jwt.issue(user, TokenKind::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_ttl_secs(),
            user: UserProfile::from(user),
        })
    }

    /// Creates the account, publishes `USER_REGISTERED` and signs the user in.
    #[instrument(skip(self))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .check(!request.name.trim().is_empty(), "name", "must not be blank")
            .check(looks_like_email(&request.email), "email", "must be a valid email")
            .check(
                request.password.chars().count() >= MIN_PASSWORD_LEN,
                "password",
                "must be at least 8 characters",
            )
            .check(
                request.role != Some(Role::Admin),
                "role",
                "cannot register as admin",
            );
        errors.into_result()?;

        let password_hash = hash_password(&request.password, self.bcrypt_cost).await?;
        let id = self
            .users
            .create_user(UserCreate {
                name: request.name,
                email: request.email,
                password_hash,
                phone: request.phone,
                address: request.address,
                role: request.role.unwrap_or(Role::Customer),
            })
            .await?;
        let user = self.users.require(id).await?;

        info!(user = %user.id, role = %user.role, "User registered");
        self.bus.publish(user_event(USER_REGISTERED, &user));
        self.tokens_for(&user)
    }

    #[instrument(skip(self))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let rejected = || ApiError::Unauthorized("invalid email or password".to_string());
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(rejected)?;
        if !verify_password(&request.password, &user.password_hash).await? {
            warn!(user = %user.id, "Wrong password");
            return Err(rejected());
        }
        if !user.active {
            return Err(UserError::Inactive(user.id.to_string()).into());
        }
        info!(user = %user.id, "User logged in");
        self.tokens_for(&user)
    }

    /// Accepts `Bearer <token>` or the bare token.
    pub fn authenticate(&self, authorization: &str) -> Result<Principal, ApiError> {
        let token = authorization
            .strip_prefix("Bearer ")
            .unwrap_or(authorization)
            .trim();
        if token.is_empty() {
            return Err(ApiError::Unauthorized("missing token".to_string()));
        }
        let claims = self.jwt.verify(token, TokenKind::Access)?;
        let user_id = claims
            .sub
            .parse::<u32>()
            .map(UserId)
            .map_err(|_| ApiError::Unauthorized("invalid subject".to_string()))?;
        Ok(Principal {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }

    /// Exchanges a refresh token for a new pair. The account must still be active,
    /// and the current role is used, not the one in the old token.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ApiError> {
        let claims = self.jwt.verify(refresh_token, TokenKind::Refresh)?;
        let user_id = claims
            .sub
            .parse::<u32>()
            .map(UserId)
            .map_err(|_| ApiError::Unauthorized("invalid subject".to_string()))?;
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("account no longer exists".to_string()))?;
        if !user.active {
            return Err(UserError::Inactive(user.id.to_string()).into());
        }
        self.tokens_for(&user)
    }
}
