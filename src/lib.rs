//! # Bookshelf API
//!
//! A REST API for a shared book catalog and per-user reading logs, built with
//! Axum and PostgreSQL.
//!
//! ## Overview
//!
//! - **Authentication**: bcrypt-hashed passwords, stateless HS256 bearer
//!   tokens, and a guard that resolves each token to a stored user
//! - **Catalog**: books grouped by category, with full-text search
//! - **Reading log**: each user records which books they read with a rating
//!   from 1 to 5 and an optional review
//! - **Pagination**: every list uses `offset`/`limit` and returns a
//!   `{ _links: { self, prev?, next? }, items }` envelope
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── bookshelf-core/     # AppError, validation lists, pagination, passwords, avatar storage
//! ├── bookshelf-config/   # Environment configuration
//! ├── bookshelf-auth/     # Token claims, issue and verify
//! ├── bookshelf-models/   # Records, DTOs and typed ids
//! ├── bookshelf-db/       # Store traits and the PostgreSQL implementation
//! └── bookshelf-cli/      # Migrations, user creation and seeding
//! src/
//! ├── middleware/         # Bearer token guard
//! ├── modules/            # auth, users, books, categories, reading
//! ├── validator.rs        # Body and path extractors
//! └── router.rs           # Route tree and global layers
//! ```
//!
//! Each feature module has a `controller.rs` (handlers and OpenAPI
//! annotations), a `service.rs` (rules, generic over the store traits) and a
//! `router.rs`.
//!
//! ## Errors
//!
//! | Status | Body |
//! |--------|------|
//! | 400 | `{"error": "Validation failed", "errors": [{"field", "message"}]}` or `{"error": "Invalid json"}` |
//! | 401 | `{"error": "invalid token"}`, `"expired token"`, `"No such user"`, `"Invalid password"`, or a duplicate |
//! | 404 | `{"error": "Book not found"}` and similar |
//! | 500 | `{"error": "Internal server error"}` |
//!
//! ## Configuration
//!
//! ```bash
//! JWT_SECRET=change-me            # required
//! TOKEN_LIFETIME=3600
//! DATABASE_URL=postgres://localhost:5432/bookshelf
//! PUBLIC_URL=http://127.0.0.1:3000
//! ```
//!
//! ## API Documentation
//!
//! - Swagger UI: `/swagger-ui`
//! - Scalar: `/scalar`
//! - OpenAPI JSON: `/api-docs/openapi.json`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod validator;

pub use bookshelf_auth;
pub use bookshelf_config;
pub use bookshelf_core;
pub use bookshelf_db;
pub use bookshelf_models;
