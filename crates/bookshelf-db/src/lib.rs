//! # Bookshelf DB
//!
//! Persistence for the Bookshelf API.
//!
//! Request handlers never talk to SQL directly. They go through the ports in
//! [`store`] (`UserStore`, `BookStore`, `CategoryStore`, `ReadingStore`, and
//! the umbrella [`Store`]), which [`PgStore`] implements on top of a
//! `sqlx::PgPool`. Each store call checks a connection out of the pool for
//! the duration of one statement and returns it on every exit path.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_config::DatabaseConfig;
//! use bookshelf_db::{PgStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! let store = PgStore::new(pool);
//! ```

pub mod postgres;
pub mod store;

use std::time::Duration;

use bookshelf_config::DatabaseConfig;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use postgres::PgStore;
pub use store::{BookStore, CategoryStore, ReadingStore, Store, StoreError, UserStore};

/// Opens the connection pool. Fails if the database cannot be reached.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await
}

/// Applies the embedded migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
