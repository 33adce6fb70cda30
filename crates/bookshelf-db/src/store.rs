//! Storage ports.
//!
//! Existence checks are separate calls from the inserts they guard, so two
//! concurrent requests can both pass a check. The schema backs every such
//! check with a unique constraint; the losing insert then fails with
//! [`StoreError::Conflict`] instead of writing a duplicate.

use async_trait::async_trait;
use bookshelf_core::Window;
use bookshelf_models::{
    Book, BookChanges, BookId, Category, NewBook, NewReadingEntry, NewUser, ReadingEntry,
    ReadingEntryId, ReadingHistoryItem, User, UserChanges, UserCredentials, UserId,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_credentials(&self, username: &str)
    -> Result<Option<UserCredentials>, StoreError>;

    /// Users ordered by id.
    async fn list_users(&self, window: Window) -> Result<Vec<User>, StoreError>;

    /// `None` when the user does not exist.
    async fn update_user(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError>;

    async fn set_avatar(&self, id: UserId, img_path: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn category_exists(&self, name: &str) -> Result<bool, StoreError>;

    async fn create_category(&self, name: &str) -> Result<Category, StoreError>;

    /// Categories ordered by name.
    async fn list_categories(&self, window: Window) -> Result<Vec<Category>, StoreError>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Whether another book already uses `title`. `except` excludes the
    /// book being updated.
    async fn title_taken(&self, title: &str, except: Option<BookId>) -> Result<bool, StoreError>;

    async fn create_book(&self, book: NewBook) -> Result<Book, StoreError>;

    async fn find_book(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Books ordered by id.
    async fn list_books(&self, window: Window) -> Result<Vec<Book>, StoreError>;

    /// Full-text match against title and description, ordered by id.
    async fn search_books(&self, query: &str, window: Window) -> Result<Vec<Book>, StoreError>;

    async fn update_book(
        &self,
        id: BookId,
        changes: BookChanges,
    ) -> Result<Option<Book>, StoreError>;
}

#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn has_read(&self, user_id: UserId, book_id: BookId) -> Result<bool, StoreError>;

    async fn create_entry(&self, entry: NewReadingEntry) -> Result<ReadingEntry, StoreError>;

    /// A user's entries joined with their books, ordered by entry id.
    async fn list_history(
        &self,
        user_id: UserId,
        window: Window,
    ) -> Result<Vec<ReadingHistoryItem>, StoreError>;

    /// Deletes the entry only if it belongs to `user_id`. Returns whether a
    /// row was removed.
    async fn delete_entry(&self, user_id: UserId, id: ReadingEntryId) -> Result<bool, StoreError>;
}

/// Everything the HTTP layer needs from persistence.
pub trait Store: UserStore + BookStore + CategoryStore + ReadingStore {}

impl<T> Store for T where T: UserStore + BookStore + CategoryStore + ReadingStore {}
