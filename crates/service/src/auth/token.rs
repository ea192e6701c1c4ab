//! Session token format: HS256 JWT carried in the `auth_token` cookie.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::AuthUser;
use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// username
    pub sub: String,
    pub uid: Uuid,
    pub iat: usize,
    pub exp: usize,
}

impl SessionClaims {
    pub fn user(&self) -> AuthUser {
        AuthUser { id: self.uid, username: self.sub.clone() }
    }
}

pub fn issue(secret: &str, user: &AuthUser, ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user.username.clone(),
        uid: user.id,
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Verify signature and expiry.
pub fn verify(secret: &str, token: &str) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}
