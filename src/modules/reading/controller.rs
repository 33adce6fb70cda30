use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use bookshelf_core::errors::ErrorResponse;
use bookshelf_core::{AppError, Page, PaginationParams};
use bookshelf_models::{LogReadRequest, ReadingEntry, ReadingEntryId, ReadingHistoryItem, UserId};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{PathId, QueryParams, ValidatedJson};

use super::service::ReadingService;

async fn history_page(
    state: &AppState,
    user_id: UserId,
    path: &str,
    params: PaginationParams,
) -> Result<Page<ReadingHistoryItem>, AppError> {
    let window = params.window()?;
    let items = ReadingService::history(state.store.as_ref(), user_id, window).await?;
    let url = state.page_url(path)?;

    Ok(Page::new(items, window, &url))
}

/// A user's reading history
#[utoipa::path(
    get,
    path = "/users/{id}/read",
    params(("id" = i32, Path, description = "User ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of history items", body = Page<ReadingHistoryItem>),
        (status = 400, description = "Invalid id, offset or limit", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Reading"
)]
#[instrument(skip(state))]
pub async fn get_user_history(
    State(state): State<AppState>,
    PathId(id): PathId,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<Page<ReadingHistoryItem>>, AppError> {
    let page = history_page(&state, UserId(id), &format!("/users/{}/read", id), params).await?;
    Ok(Json(page))
}

/// The authenticated user's reading history
#[utoipa::path(
    get,
    path = "/users/me/read",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of history items", body = Page<ReadingHistoryItem>),
        (status = 400, description = "Invalid offset or limit", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Reading",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn get_my_history(
    State(state): State<AppState>,
    auth_user: AuthUser,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<Page<ReadingHistoryItem>>, AppError> {
    let page = history_page(&state, auth_user.0.id, "/users/me/read", params).await?;
    Ok(Json(page))
}

/// Log a book as read
#[utoipa::path(
    post,
    path = "/users/me/read",
    request_body = LogReadRequest,
    responses(
        (status = 201, description = "Entry created", body = ReadingEntry),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Already read, or missing/invalid token", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Reading",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.0.id))]
pub async fn log_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<LogReadRequest>,
) -> Result<(StatusCode, Json<ReadingEntry>), AppError> {
    let entry = ReadingService::log_read(state.store.as_ref(), auth_user.0.id, dto).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove one of the authenticated user's entries
#[utoipa::path(
    delete,
    path = "/users/me/read/{id}",
    params(("id" = i32, Path, description = "Reading entry ID")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 400, description = "ID is not a positive integer", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "No such read exists", body = ErrorResponse)
    ),
    tag = "Reading",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn delete_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    ReadingService::delete(state.store.as_ref(), auth_user.0.id, ReadingEntryId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
