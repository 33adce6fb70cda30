use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use bookshelf_core::errors::ErrorResponse;
use bookshelf_core::pagination::{Link, Links};
use bookshelf_core::{FieldError, PaginationParams};
use bookshelf_models::{
    AdminResponse, Book, Category, CreateBookRequest, CreateCategoryRequest, LogReadRequest,
    LoginRequest, LoginResponse, ReadingEntry, ReadingHistoryItem, RegisterRequest,
    UpdateBookRequest, UpdateProfileRequest, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_admin,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::update_me,
        crate::modules::users::controller::upload_avatar,
        crate::modules::books::controller::get_books,
        crate::modules::books::controller::get_book,
        crate::modules::books::controller::create_book,
        crate::modules::books::controller::update_book,
        crate::modules::categories::controller::get_categories,
        crate::modules::categories::controller::create_category,
        crate::modules::reading::controller::get_user_history,
        crate::modules::reading::controller::get_my_history,
        crate::modules::reading::controller::log_read,
        crate::modules::reading::controller::delete_read,
    ),
    components(
        schemas(
            User,
            RegisterRequest,
            UpdateProfileRequest,
            LoginRequest,
            LoginResponse,
            AdminResponse,
            Book,
            CreateBookRequest,
            UpdateBookRequest,
            Category,
            CreateCategoryRequest,
            ReadingEntry,
            ReadingHistoryItem,
            LogReadRequest,
            PaginationParams,
            Link,
            Links,
            FieldError,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token check"),
        (name = "Users", description = "User records and profiles"),
        (name = "Books", description = "Book catalog and full-text search"),
        (name = "Categories", description = "Book categories"),
        (name = "Reading", description = "Per-user reading log")
    ),
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Book catalog and reading-log REST API built with Rust, Axum and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
