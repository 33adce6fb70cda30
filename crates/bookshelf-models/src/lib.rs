//! # Bookshelf Models
//!
//! Domain models and DTOs for the Bookshelf API.
//!
//! Records (`User`, `Book`, `Category`, `ReadingEntry`) derive `sqlx::FromRow`
//! so the store can map rows directly. Request DTOs derive `validator::Validate`
//! with one rule per documented constraint; fields that may legitimately be
//! absent are `Option`s so a missing value is reported as a field error
//! rather than a body rejection.
//!
//! # Modules
//!
//! - [`ids`]: typed integer keys
//! - [`users`]: users, credentials and profile DTOs
//! - [`auth`]: login and admin bodies
//! - [`books`]: books, book DTOs and list query
//! - [`categories`]: categories
//! - [`reading`]: reading-log entries and history items
//! - [`validators`]: custom `validator` rules

pub mod auth;
pub mod books;
pub mod categories;
pub mod ids;
pub mod reading;
pub mod users;
pub mod validators;

// Re-export commonly used types at crate root for convenience
pub use auth::{AdminResponse, LoginRequest, LoginResponse};
pub use books::{
    Book, BookChanges, BookListQuery, CreateBookRequest, NewBook, UpdateBookRequest,
};
pub use categories::{Category, CreateCategoryRequest};
pub use ids::{BookId, ReadingEntryId, UserId};
pub use reading::{
    LogReadRequest, MAX_RATING, MIN_RATING, NewReadingEntry, ReadingEntry, ReadingHistoryItem,
};
pub use users::{
    NewUser, RegisterRequest, UpdateProfileRequest, User, UserChanges, UserCredentials,
};
