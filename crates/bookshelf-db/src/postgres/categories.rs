use async_trait::async_trait;
use bookshelf_core::Window;
use bookshelf_models::Category;
use tracing::instrument;

use super::{PgStore, map_write_error};
use crate::store::{CategoryStore, StoreError};

#[async_trait]
impl CategoryStore for PgStore {
    #[instrument(skip(self))]
    async fn category_exists(&self, name: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(name)
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        sqlx::query_as::<_, Category>("INSERT INTO categories (id) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(self.pool())
            .await
            .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn list_categories(&self, window: Window) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id FROM categories ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(window.offset)
        .bind(window.limit)
        .fetch_all(self.pool())
        .await?;

        Ok(categories)
    }
}
