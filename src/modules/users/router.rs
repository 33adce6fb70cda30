use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::{get_me, get_user, get_users, update_me, upload_avatar};

/// Multipart framing on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn init_users_router(state: AppState) -> Router<AppState> {
    let upload_limit = state.storage_config.max_avatar_bytes + FORM_OVERHEAD_BYTES;

    let me = Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route(
            "/me/profile",
            post(upload_avatar).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(get_users))
        .route("/{id}", get(get_user))
        .merge(me)
}
