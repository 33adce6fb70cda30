use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use bookshelf_auth::{TokenError, verify_token};
use bookshelf_core::AppError;
use bookshelf_models::User;

use crate::metrics::track_jwt_rejected;
use crate::state::AppState;

pub const INVALID_TOKEN: &str = "invalid token";
pub const EXPIRED_TOKEN: &str = "expired token";

/// The user a verified bearer token belongs to.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by `require_auth` on this route.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(parts, state).await;
        resolve_bearer(state, token.as_deref()).await
    }
}

/// Rejects the request unless it carries a valid token for an existing user.
/// The resolved [`AuthUser`] is stored in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = bearer_token(&mut parts, &state).await;
    let user = resolve_bearer(&state, token.as_deref()).await?;

    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// `None` when the header is absent or not a bearer credential.
async fn bearer_token(parts: &mut Parts, state: &AppState) -> Option<String> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

async fn resolve_bearer(state: &AppState, token: Option<&str>) -> Result<AuthUser, AppError> {
    let token = token.ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

    let claims = verify_token(token, &state.jwt_config).map_err(|e| match e {
        TokenError::Expired => {
            track_jwt_rejected("expired");
            AppError::unauthorized(EXPIRED_TOKEN)
        }
        other => {
            tracing::debug!(error = %other, "Bearer token rejected");
            track_jwt_rejected("invalid");
            AppError::unauthorized(INVALID_TOKEN)
        }
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

    // A deleted user's token is rejected the same way as a forged one.
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

    Ok(AuthUser(user))
}
