//! HS256 access and refresh tokens.

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::model::{Role, User};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
    pub typ: TokenKind,
}

pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl JwtCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs
    }

    pub fn claims_for(&self, user: &User, kind: TokenKind) -> Claims {
        let now = Utc::now().timestamp().max(0) as u64;
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        Claims {
            sub: user.id.0.to_string(),
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl,
            typ: kind,
        }
    }

    pub fn issue(&self, user: &User, kind: TokenKind) -> Result<String, ApiError> {
        self.encode(&self.claims_for(user, kind))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))
    }

    /// Signature, issuer, expiry (no leeway) and token kind must all check out.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                ApiError::Unauthorized(format!("invalid token: {}", e))
            })?
            .claims;
        if claims.typ != kind {
            return Err(ApiError::Unauthorized("wrong token type".to_string()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: UserId(42),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            phone: None,
            address: None,
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn codec(secret: &str) -> JwtCodec {
        JwtCodec::new(&AuthConfig {
            jwt_secret: secret.into(),
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_round_trip_keeps_identity() {
        let jwt = codec("secret");
        let token = jwt.issue(&user(Role::RestaurantOwner), TokenKind::Access).unwrap();
        let claims = jwt.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::RestaurantOwner);
        assert_eq!(claims.iss, "food-delivery");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let jwt = codec("secret");
        let mut claims = jwt.claims_for(&user(Role::Customer), TokenKind::Access);
        claims.iat -= 3600;
        claims.exp = claims.iat + 60;
        let token = jwt.encode(&claims).unwrap();
        assert!(matches!(
            jwt.verify(&token, TokenKind::Access),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_secret_and_wrong_kind_are_rejected() {
        let token = codec("secret")
            .issue(&user(Role::Customer), TokenKind::Refresh)
            .unwrap();
        assert!(codec("other").verify(&token, TokenKind::Refresh).is_err());
        assert!(codec("secret").verify(&token, TokenKind::Access).is_err());
        assert!(codec("secret").verify(&token, TokenKind::Refresh).is_ok());
        assert!(codec("secret").verify("not.a.token", TokenKind::Access).is_err());
    }
}
