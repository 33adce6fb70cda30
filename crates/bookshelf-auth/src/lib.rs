//! # Bookshelf Auth
//!
//! Bearer token utilities for the Bookshelf API.
//!
//! Tokens are HS256-signed JWTs carrying only the user id (`sub`) and the
//! issue/expiry timestamps. They are never stored server side: a token is
//! valid exactly as long as its signature checks out against the configured
//! secret and its expiry has not passed. There is no refresh flow, a client
//! logs in again once its token expires.
//!
//! - [`claims`]: the claim set
//! - [`jwt`]: issuing and verifying tokens, with [`TokenError`] keeping
//!   expiry apart from every other failure
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_auth::{issue_token, verify_token, TokenError};
//! use bookshelf_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = issue_token(user.id, &config)?;
//!
//! match verify_token(&token, &config) {
//!     Ok(claims) => println!("user {}", claims.sub),
//!     Err(TokenError::Expired) => println!("log in again"),
//!     Err(_) => println!("rejected"),
//! }
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{TokenError, issue_token, issue_token_at, verify_token, verify_token_at};
