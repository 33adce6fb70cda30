use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::{delete_read, get_my_history, get_user_history, log_read};

/// Mounted under `/users` alongside the users router.
pub fn init_reading_router(state: AppState) -> Router<AppState> {
    let me = Router::new()
        .route("/me/read", get(get_my_history).post(log_read))
        .route("/me/read/{id}", delete(delete_read))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/{id}/read", get(get_user_history))
        .merge(me)
}
