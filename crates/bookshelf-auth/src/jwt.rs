//! Token creation and verification.
//!
//! The `_at` variants take the current time explicitly so expiry behaviour
//! can be tested without sleeping; the plain variants use the wall clock.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use bookshelf_config::JwtConfig;
use bookshelf_models::UserId;

use crate::claims::Claims;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature is valid but the token is past its expiry.
    #[error("expired token")]
    Expired,

    /// Bad signature, malformed token or unusable claims.
    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

pub fn issue_token(user_id: UserId, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    issue_token_at(user_id, jwt_config, Utc::now().timestamp())
}

pub fn issue_token_at(
    user_id: UserId,
    jwt_config: &JwtConfig,
    now: i64,
) -> Result<String, TokenError> {
    if now.checked_add(jwt_config.token_lifetime).is_none() {
        return Err(TokenError::Signing("token lifetime out of range".to_string()));
    }
    let claims = Claims::new(user_id, now, jwt_config.token_lifetime);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    verify_token_at(token, jwt_config, Utc::now().timestamp())
}

/// Checks the signature first, then expiry. A tampered token that is also
/// past its expiry is reported as [`TokenError::Invalid`]. A token is
/// expired from the second its `exp` is reached.
pub fn verify_token_at(token: &str, jwt_config: &JwtConfig, now: i64) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)?;

    if now >= claims.exp {
        return Err(TokenError::Expired);
    }

    if claims.user_id().is_none() {
        return Err(TokenError::Invalid);
    }

    Ok(claims)
}
