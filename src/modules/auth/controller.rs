use axum::{Json, extract::State, http::StatusCode};
use bookshelf_core::AppError;
use bookshelf_core::errors::ErrorResponse;
use bookshelf_models::{AdminResponse, LoginRequest, LoginResponse, RegisterRequest, User};
use tracing::instrument;

use crate::metrics::track_user_registered;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{JsonBody, ValidatedJson};

use super::service::AuthService;

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Username or password too short", body = ErrorResponse),
        (status = 401, description = "Username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register(state.store.as_ref(), dto).await?;
    track_user_registered();
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "No such user or invalid password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(state.store.as_ref(), dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Protected endpoint returning the caller
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Token accepted", body = AdminResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.0.id))]
pub async fn get_admin(auth_user: AuthUser) -> Json<AdminResponse> {
    Json(AdminResponse { data: auth_user.0 })
}
