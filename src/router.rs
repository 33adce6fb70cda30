use std::any::Any;

use anyhow::anyhow;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, middleware};
use bookshelf_config::storage::AVATAR_ROUTE;
use bookshelf_core::AppError;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::auth::init_auth_router;
use crate::modules::books::init_books_router;
use crate::modules::categories::init_categories_router;
use crate::modules::reading::init_reading_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

pub const NOT_FOUND_MESSAGE: &str = "Not found";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state);
    let avatars = ServeDir::new(&state.storage_config.upload_dir);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_auth_router(state.clone()))
        .nest(
            "/users",
            init_users_router(state.clone()).merge(init_reading_router(state.clone())),
        )
        .nest("/books", init_books_router())
        .nest("/categories", init_categories_router())
        .method_not_allowed_fallback(method_not_allowed)
        .nest_service(AVATAR_ROUTE, avatars)
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

async fn not_found() -> AppError {
    AppError::not_found(anyhow!(NOT_FOUND_MESSAGE))
}

async fn method_not_allowed() -> AppError {
    AppError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        anyhow!(METHOD_NOT_ALLOWED_MESSAGE),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::internal(anyhow!("handler panicked: {}", detail)).into_response()
}
