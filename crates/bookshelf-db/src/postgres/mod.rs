//! PostgreSQL implementation of the storage ports.

mod books;
mod categories;
mod reading;
mod users;

use sqlx::PgPool;

use crate::store::StoreError;

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a unique violation to [`StoreError::Conflict`].
pub(crate) fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(db_err.constraint().unwrap_or("unique").to_string());
    }
    StoreError::Database(e)
}
