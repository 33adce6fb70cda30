use async_trait::async_trait;
use bookshelf_core::Window;
use bookshelf_models::{Book, BookChanges, BookId, NewBook};
use tracing::instrument;

use super::{PgStore, map_write_error};
use crate::store::{BookStore, StoreError};

const BOOK_COLUMNS: &str =
    "id, title, author, description, isbn10, isbn13, published, pagecount, language, category";

/// Must stay identical to the expression indexed in the migration.
const SEARCH_DOCUMENT: &str =
    "to_tsvector('english', title || ' ' || coalesce(description, ''))";

#[async_trait]
impl BookStore for PgStore {
    #[instrument(skip(self))]
    async fn title_taken(&self, title: &str, except: Option<BookId>) -> Result<bool, StoreError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM books WHERE title = $1 AND ($2::int IS NULL OR id <> $2)
            )",
        )
        .bind(title)
        .bind(except)
        .fetch_one(self.pool())
        .await?;

        Ok(taken)
    }

    #[instrument(skip(self, book), fields(title = %book.title))]
    async fn create_book(&self, book: NewBook) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books
                (title, author, description, isbn10, isbn13, published, pagecount, language, category)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.isbn10)
        .bind(&book.isbn13)
        .bind(&book.published)
        .bind(book.pagecount)
        .bind(&book.language)
        .bind(&book.category)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn find_book(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(book)
    }

    #[instrument(skip(self))]
    async fn list_books(&self, window: Window) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(window.offset)
        .bind(window.limit)
        .fetch_all(self.pool())
        .await?;

        Ok(books)
    }

    #[instrument(skip(self))]
    async fn search_books(&self, query: &str, window: Window) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books
             WHERE {SEARCH_DOCUMENT} @@ plainto_tsquery('english', $1)
             ORDER BY id OFFSET $2 LIMIT $3"
        ))
        .bind(query)
        .bind(window.offset)
        .bind(window.limit)
        .fetch_all(self.pool())
        .await?;

        Ok(books)
    }

    #[instrument(skip(self, changes))]
    async fn update_book(
        &self,
        id: BookId,
        changes: BookChanges,
    ) -> Result<Option<Book>, StoreError> {
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                isbn10 = COALESCE($5, isbn10),
                isbn13 = COALESCE($6, isbn13),
                published = COALESCE($7, published),
                pagecount = COALESCE($8, pagecount),
                language = COALESCE($9, language),
                category = COALESCE($10, category)
             WHERE id = $1
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.author)
        .bind(&changes.description)
        .bind(&changes.isbn10)
        .bind(&changes.isbn13)
        .bind(&changes.published)
        .bind(changes.pagecount)
        .bind(&changes.language)
        .bind(&changes.category)
        .fetch_optional(self.pool())
        .await
        .map_err(map_write_error)
    }
}
