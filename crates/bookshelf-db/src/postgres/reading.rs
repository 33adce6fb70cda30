use async_trait::async_trait;
use bookshelf_core::Window;
use bookshelf_models::{
    BookId, NewReadingEntry, ReadingEntry, ReadingEntryId, ReadingHistoryItem, UserId,
};
use tracing::instrument;

use super::{PgStore, map_write_error};
use crate::store::{ReadingStore, StoreError};

#[async_trait]
impl ReadingStore for PgStore {
    #[instrument(skip(self))]
    async fn has_read(&self, user_id: UserId, book_id: BookId) -> Result<bool, StoreError> {
        let read = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM books_read WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(self.pool())
        .await?;

        Ok(read)
    }

    #[instrument(skip(self, entry), fields(user_id = %entry.user_id, book_id = %entry.book_id))]
    async fn create_entry(&self, entry: NewReadingEntry) -> Result<ReadingEntry, StoreError> {
        sqlx::query_as::<_, ReadingEntry>(
            "INSERT INTO books_read (user_id, book_id, rating, review)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, book_id, rating, review",
        )
        .bind(entry.user_id)
        .bind(entry.book_id)
        .bind(entry.rating)
        .bind(&entry.review)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn list_history(
        &self,
        user_id: UserId,
        window: Window,
    ) -> Result<Vec<ReadingHistoryItem>, StoreError> {
        let items = sqlx::query_as::<_, ReadingHistoryItem>(
            "SELECT r.id, r.book_id, b.title, b.author, r.rating, r.review
             FROM books_read r
             JOIN books b ON b.id = r.book_id
             WHERE r.user_id = $1
             ORDER BY r.id
             OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(window.offset)
        .bind(window.limit)
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    #[instrument(skip(self))]
    async fn delete_entry(&self, user_id: UserId, id: ReadingEntryId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books_read WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
