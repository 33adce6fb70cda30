use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use bookshelf_core::errors::ErrorResponse;
use bookshelf_core::{AppError, Page};
use bookshelf_models::{Book, BookId, BookListQuery, CreateBookRequest, UpdateBookRequest};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{CheckedJson, PathId, QueryParams};

use super::service::BookService;

/// List or search books
#[utoipa::path(
    get,
    path = "/books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Page of books", body = Page<Book>),
        (status = 400, description = "Invalid offset or limit", body = ErrorResponse)
    ),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_books(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<BookListQuery>,
) -> Result<Json<Page<Book>>, AppError> {
    let window = query.pagination().window()?;
    let search = query.search_term();

    let books = BookService::list(state.store.as_ref(), window, search).await?;

    let mut url = state.page_url("/books")?;
    if let Some(term) = search {
        url = url.with_param("search", term);
    }

    Ok(Json(Page::new(books, window, &url)))
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 400, description = "ID is not a positive integer", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<Book>, AppError> {
    let book = BookService::get(state.store.as_ref(), BookId(id)).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.0.id))]
pub async fn create_book(
    State(state): State<AppState>,
    auth_user: AuthUser,
    CheckedJson(dto, mistyped): CheckedJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = BookService::create(state.store.as_ref(), dto, mistyped).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
///
/// Only the supplied fields change. Also accepted as `POST /books/{id}`.
#[utoipa::path(
    patch,
    path = "/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Updated book", body = Book),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.0.id))]
pub async fn update_book(
    State(state): State<AppState>,
    auth_user: AuthUser,
    PathId(id): PathId,
    CheckedJson(dto, mistyped): CheckedJson<UpdateBookRequest>,
) -> Result<Json<Book>, AppError> {
    let book = BookService::update(state.store.as_ref(), BookId(id), dto, mistyped).await?;
    Ok(Json(book))
}
