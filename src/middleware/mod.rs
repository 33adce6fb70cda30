//! Request guards.
//!
//! - [`auth`]: bearer token verification and user resolution
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The token's signature and expiry are checked
//! 3. The `sub` claim is resolved to a stored user
//! 4. The handler receives that user through [`auth::AuthUser`]
//!
//! Routers guard whole groups with `route_layer(from_fn_with_state(state,
//! require_auth))`; single handlers can take `AuthUser` as an argument
//! instead.

pub mod auth;
