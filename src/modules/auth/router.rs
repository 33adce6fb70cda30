use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::{get_admin, login_user, register_user};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/admin", get(get_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .merge(protected)
}
