use anyhow::anyhow;
use bookshelf_core::{AppError, Window};
use bookshelf_db::{BookStore, ReadingStore, StoreError, UserStore};
use bookshelf_models::{
    BookId, LogReadRequest, NewReadingEntry, ReadingEntry, ReadingEntryId, ReadingHistoryItem,
    UserId,
};
use tracing::instrument;

use crate::metrics::track_read_logged;
use crate::modules::books::service::BOOK_NOT_FOUND;
use crate::modules::users::service::USER_NOT_FOUND;

pub const ALREADY_READ: &str = "You have already read this book";
pub const NO_SUCH_READ: &str = "No such read exists";

pub struct ReadingService;

impl ReadingService {
    #[instrument(skip(store))]
    pub async fn history<S>(
        store: &S,
        user_id: UserId,
        window: Window,
    ) -> Result<Vec<ReadingHistoryItem>, AppError>
    where
        S: UserStore + ReadingStore + ?Sized,
    {
        if store.find_user(user_id).await?.is_none() {
            return Err(AppError::not_found(anyhow!(USER_NOT_FOUND)));
        }

        Ok(store.list_history(user_id, window).await?)
    }

    /// Records that `user_id` read a book. The request has passed its field
    /// rules; the book must exist and must not be logged already.
    #[instrument(skip(store, dto), fields(book_id = ?dto.book_id))]
    pub async fn log_read<S>(
        store: &S,
        user_id: UserId,
        dto: LogReadRequest,
    ) -> Result<ReadingEntry, AppError>
    where
        S: BookStore + ReadingStore + ?Sized,
    {
        let book_id = BookId(dto.book_id.unwrap_or_default());
        let rating = dto.rating.unwrap_or_default();

        if store.find_book(book_id).await?.is_none() {
            return Err(AppError::not_found(anyhow!(BOOK_NOT_FOUND)));
        }

        if store.has_read(user_id, book_id).await? {
            return Err(AppError::conflict(ALREADY_READ));
        }

        let entry = store
            .create_entry(NewReadingEntry {
                user_id,
                book_id,
                rating,
                review: dto.review,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::conflict(ALREADY_READ),
                other => AppError::internal(other),
            })?;

        track_read_logged(rating);

        Ok(entry)
    }

    #[instrument(skip(store))]
    pub async fn delete<S>(store: &S, user_id: UserId, id: ReadingEntryId) -> Result<(), AppError>
    where
        S: ReadingStore + ?Sized,
    {
        if store.delete_entry(user_id, id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(anyhow!(NO_SUCH_READ)))
        }
    }
}
