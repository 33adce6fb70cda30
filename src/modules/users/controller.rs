use anyhow::anyhow;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use bookshelf_core::errors::ErrorResponse;
use bookshelf_core::file_storage::{AvatarImage, ImageKind};
use bookshelf_core::{AppError, Page, PaginationParams};
use bookshelf_models::{UpdateProfileRequest, User, UserId};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{PathId, QueryParams, ValidatedJson};

use super::service::UserService;

pub const NO_IMAGE_RECEIVED: &str = "No image received";
pub const IMAGE_TYPE_MESSAGE: &str = "Image has to be of type png, jpg or jpeg";

/// List users
#[utoipa::path(
    get,
    path = "/users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = Page<User>),
        (status = 400, description = "Invalid offset or limit", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<Page<User>>, AppError> {
    let window = params.window()?;
    let users = UserService::list(state.store.as_ref(), window).await?;
    let url = state.page_url("/users")?;

    Ok(Json(Page::new(users, window, &url)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 400, description = "ID is not a positive integer", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<User>, AppError> {
    let user = UserService::get(state.store.as_ref(), UserId(id)).await?;
    Ok(Json(user))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.0.id))]
pub async fn get_me(auth_user: AuthUser) -> Json<User> {
    Json(auth_user.0)
}

/// Update the authenticated user's name or password
#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.0.id))]
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_profile(state.store.as_ref(), auth_user.0.id, dto).await?;
    Ok(Json(user))
}

/// Upload a profile image
///
/// Expects a multipart form with an `image` field holding a png or jpeg.
#[utoipa::path(
    post,
    path = "/users/me/profile",
    request_body(content_type = "multipart/form-data", description = "Form with an `image` file field"),
    responses(
        (status = 200, description = "User with the new image", body = User),
        (status = 400, description = "No image, wrong type or too large", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = %auth_user.0.id))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<User>, AppError> {
    let max_bytes = state.storage_config.max_avatar_bytes;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let kind = field
            .content_type()
            .and_then(ImageKind::from_content_type)
            .or_else(|| field.file_name().and_then(ImageKind::from_file_name))
            .ok_or_else(|| AppError::field("image", IMAGE_TYPE_MESSAGE))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;

        image = Some(AvatarImage::new(bytes.to_vec(), kind));
        break;
    }

    let image = image.ok_or_else(|| AppError::bad_request(anyhow!(NO_IMAGE_RECEIVED)))?;

    let user = UserService::update_avatar(
        state.store.as_ref(),
        state.avatars.as_ref(),
        auth_user.0.id,
        image,
    )
    .await?;

    Ok(Json(user))
}

fn multipart_error(err: axum::extract::multipart::MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::field(
            "image",
            format!("File exceeds maximum size of {} bytes", max_bytes),
        )
    } else {
        AppError::bad_request(anyhow!(err.body_text()))
    }
}
