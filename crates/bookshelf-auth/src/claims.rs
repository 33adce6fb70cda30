use bookshelf_models::UserId;
use serde::{Deserialize, Serialize};

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject claim), as a decimal string
    pub sub: String,
    /// Issued-at (Unix timestamp)
    pub iat: i64,
    /// Expiry (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: UserId, issued_at: i64, lifetime: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + lifetime,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse::<i32>().ok().filter(|id| *id > 0).map(UserId)
    }
}
