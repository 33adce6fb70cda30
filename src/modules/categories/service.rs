use bookshelf_core::{AppError, Window};
use bookshelf_db::{CategoryStore, StoreError};
use bookshelf_models::Category;
use tracing::instrument;

use crate::metrics::track_category_created;

pub const CATEGORY_EXISTS: &str = "Category already exists";

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(store))]
    pub async fn list<S>(store: &S, window: Window) -> Result<Vec<Category>, AppError>
    where
        S: CategoryStore + ?Sized,
    {
        Ok(store.list_categories(window).await?)
    }

    #[instrument(skip(store))]
    pub async fn create<S>(store: &S, name: &str) -> Result<Category, AppError>
    where
        S: CategoryStore + ?Sized,
    {
        let name = name.trim();

        if store.category_exists(name).await? {
            return Err(AppError::conflict(CATEGORY_EXISTS));
        }

        let category = store.create_category(name).await.map_err(|e| match e {
            StoreError::Conflict(_) => AppError::conflict(CATEGORY_EXISTS),
            other => AppError::internal(other),
        })?;

        track_category_created();

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_duplicate_category_is_a_conflict() {
        let store = MemoryStore::new();
        CategoryService::create(&store, "Fantasy").await.unwrap();

        let err = CategoryService::create(&store, " Fantasy ").await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.public_message(), CATEGORY_EXISTS);
    }
}
