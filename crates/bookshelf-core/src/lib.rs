//! # Bookshelf Core
//!
//! Core types, errors, and utilities for the Bookshelf API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`validation`]: Ordered field-level validation error lists
//! - [`pagination`]: Offset/limit windows and the `_links` list envelope
//! - [`password`]: Password hashing and verification
//! - [`file_storage`]: Avatar storage abstraction and its local-disk backend
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::errors::AppError;
//! use bookshelf_core::pagination::{Page, PageUrl, PaginationParams};
//! use bookshelf_core::password::{hash_password, verify_password};
//!
//! // Hash a password
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash));
//!
//! // Resolve a window and wrap a page of results
//! let window = PaginationParams::default().window()?;
//! let url = PageUrl::new("http://127.0.0.1:3000", "/books")?;
//! let page = Page::new(books, window, &url);
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod validation;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{Page, PageUrl, PaginationParams, Window};
pub use password::{hash_password, verify_password};
pub use validation::{FieldError, FieldErrors};
