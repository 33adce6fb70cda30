use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::validate_not_blank;

/// A category's id is its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    #[schema(example = "Science Fiction")]
    pub id: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(
        required(message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Science Fiction")]
    pub name: Option<String>,
}
