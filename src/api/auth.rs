//! Access tokens and the [`Identity`] extractor.
//!
//! Tokens are HS256 JWTs carrying `{user_id, role, rooming_house_id?, iat, exp}`.
//! Owner tokens never carry a rooming house; admin tokens always do.

use crate::{
    api::AppState,
    core::scope::{Identity, Role},
    errors::{Error, Result},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Owner or admin account id
    pub user_id: Uuid,
    /// Caller role
    pub role: Role,
    /// Rooming house of an admin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooming_house_id: Option<Uuid>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    fn into_identity(self) -> Result<Identity> {
        match (self.role, self.rooming_house_id) {
            (Role::Owner, _) => Ok(Identity::owner(self.user_id)),
            (Role::Admin, Some(house)) => Ok(Identity::admin(self.user_id, house)),
            (Role::Admin, None) => Err(Error::unauthorized("invalid token")),
        }
    }
}

/// Issues and validates access tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service signing with `secret`.
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Signs a token for `identity`.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| Error::internal("token lifetime out of range"))?;
        let claims = Claims {
            user_id: identity.user_id,
            role: identity.role,
            rooming_house_id: match identity.role {
                Role::Owner => None,
                Role::Admin => identity.rooming_house_id,
            },
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("Failed to sign token: {e}")))
    }

    /// Verifies signature and expiry, returning the identity the token carries.
    pub fn validate(&self, token: &str) -> Result<Identity> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::unauthorized("token expired"),
                _ => Error::unauthorized("invalid token"),
            })?
            .claims
            .into_identity()
    }
}

fn bearer_token(parts: &Parts) -> Result<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("missing bearer token"))
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)?;
        state.tokens.validate(token)
    }
}
