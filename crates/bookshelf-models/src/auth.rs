use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;

/// Credentials are checked against the store, so no shape rules apply.
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice123")]
    pub username: String,
    #[schema(example = "s3cret!")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of the protected admin endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub data: User,
}
