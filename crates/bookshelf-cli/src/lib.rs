//! # Bookshelf CLI
//!
//! Database seeding utilities for Bookshelf development and testing.
//!
//! ## Usage
//!
//! ```ignore
//! use bookshelf_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::default().with_users(50);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
