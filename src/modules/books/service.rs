//! Catalog operations.
//!
//! Book bodies are validated here rather than in the extractor: the shape
//! rules and the store-backed checks (unique title, existing category) are
//! reported together in one list, and nothing is written unless that list is
//! empty.

use anyhow::anyhow;
use bookshelf_core::{AppError, FieldErrors, Window};
use bookshelf_db::{BookStore, CategoryStore, StoreError};
use bookshelf_models::{Book, BookChanges, BookId, CreateBookRequest, UpdateBookRequest};
use tracing::instrument;
use validator::Validate;

use crate::metrics::track_book_created;

pub const BOOK_NOT_FOUND: &str = "Book not found";
pub const TITLE_TAKEN: &str = "Title is already taken";
pub const CATEGORY_MISSING: &str = "Category does not exist";

pub struct BookService;

impl BookService {
    /// Lists by id, or full-text matches when `search` is given.
    #[instrument(skip(store))]
    pub async fn list<S>(store: &S, window: Window, search: Option<&str>) -> Result<Vec<Book>, AppError>
    where
        S: BookStore + ?Sized,
    {
        let books = match search {
            Some(query) => store.search_books(query, window).await?,
            None => store.list_books(window).await?,
        };

        Ok(books)
    }

    #[instrument(skip(store))]
    pub async fn get<S>(store: &S, id: BookId) -> Result<Book, AppError>
    where
        S: BookStore + ?Sized,
    {
        store
            .find_book(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!(BOOK_NOT_FOUND)))
    }

    /// `mistyped` carries fields the body had with the wrong JSON type; they
    /// are reported alongside the rule and reference checks.
    #[instrument(skip(store, dto, mistyped), fields(title = ?dto.title))]
    pub async fn create<S>(
        store: &S,
        dto: CreateBookRequest,
        mistyped: FieldErrors,
    ) -> Result<Book, AppError>
    where
        S: BookStore + CategoryStore + ?Sized,
    {
        let mut errors = mistyped.with_rules(FieldErrors::from_validation(dto.validate()));
        check_references(
            store,
            &mut errors,
            dto.title.as_deref(),
            dto.category.as_deref(),
            None,
        )
        .await?;
        errors.into_result()?;

        let book = store
            .create_book(dto.into_new_book())
            .await
            .map_err(title_conflict)?;

        track_book_created();
        tracing::info!(book_id = %book.id, "Book created");

        Ok(book)
    }

    /// Partial update; absent fields keep their stored values.
    #[instrument(skip(store, dto, mistyped))]
    pub async fn update<S>(
        store: &S,
        id: BookId,
        dto: UpdateBookRequest,
        mistyped: FieldErrors,
    ) -> Result<Book, AppError>
    where
        S: BookStore + CategoryStore + ?Sized,
    {
        Self::get(store, id).await?;

        let mut errors = mistyped.with_rules(FieldErrors::from_validation(dto.validate()));
        check_references(
            store,
            &mut errors,
            dto.title.as_deref(),
            dto.category.as_deref(),
            Some(id),
        )
        .await?;
        errors.into_result()?;

        store
            .update_book(id, BookChanges::from(dto))
            .await
            .map_err(title_conflict)?
            .ok_or_else(|| AppError::not_found(anyhow!(BOOK_NOT_FOUND)))
    }
}

/// Store-backed rules, appended after the shape rules. Blank values are
/// already reported by the shape rules and are not looked up.
async fn check_references<S>(
    store: &S,
    errors: &mut FieldErrors,
    title: Option<&str>,
    category: Option<&str>,
    except: Option<BookId>,
) -> Result<(), AppError>
where
    S: BookStore + CategoryStore + ?Sized,
{
    if let Some(title) = title.filter(|t| !t.trim().is_empty())
        && store.title_taken(title, except).await?
    {
        errors.push("title", TITLE_TAKEN);
    }

    if let Some(category) = category.filter(|c| !c.trim().is_empty())
        && !store.category_exists(category).await?
    {
        errors.push("category", CATEGORY_MISSING);
    }

    Ok(())
}

/// A concurrent insert won the title.
fn title_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::Conflict(_) => AppError::field("title", TITLE_TAKEN),
        other => AppError::internal(other),
    }
}
