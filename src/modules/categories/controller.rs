use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use bookshelf_core::errors::ErrorResponse;
use bookshelf_core::{AppError, Page, PaginationParams};
use bookshelf_models::{Category, CreateCategoryRequest};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson};

use super::service::CategoryService;

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of categories", body = Page<Category>),
        (status = 400, description = "Invalid offset or limit", body = ErrorResponse)
    ),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<Page<Category>>, AppError> {
    let window = params.window()?;
    let categories = CategoryService::list(state.store.as_ref(), window).await?;
    let url = state.page_url("/categories")?;

    Ok(Json(Page::new(categories, window, &url)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Blank name", body = ErrorResponse),
        (status = 401, description = "Category exists, or missing/invalid token", body = ErrorResponse)
    ),
    tag = "Categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.0.id))]
pub async fn create_category(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let name = dto.name.unwrap_or_default();
    let category = CategoryService::create(state.store.as_ref(), &name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
