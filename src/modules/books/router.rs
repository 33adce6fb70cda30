use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_book, get_book, get_books, update_book};

pub fn init_books_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_books).post(create_book))
        .route("/{id}", get(get_book).patch(update_book).post(update_book))
}
