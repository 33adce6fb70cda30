//! HTTP-facing error type.
//!
//! [`AppError`] pairs a status code with an [`anyhow::Error`] and, for
//! validation failures, the list of violated field rules. Any error that is
//! not explicitly classified converts into a 500 through the blanket `From`
//! impl, so `?` at the handler boundary never leaks internal detail.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::FieldError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub details: Vec<FieldError>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            details: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    /// Duplicate username, category or reading-log entry. This API reports
    /// conflicts as 401.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow!(VALIDATION_FAILED_MESSAGE),
            details: errors,
        }
    }

    /// Validation failure on a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    /// The message a client would see for this error.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = ?self.error, "Request failed");
        }

        let body = ErrorResponse {
            error: self.public_message(),
            errors: self.details,
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let (status, body) =
            body_json(AppError::internal(anyhow!("connection refused on 5432"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_unauthorized_keeps_message() {
        let (status, body) = body_json(AppError::unauthorized("expired token")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "expired token" }));
    }

    #[tokio::test]
    async fn test_conflict_is_reported_as_unauthorized() {
        let (status, _) = body_json(AppError::conflict("Category already exists")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_validation_lists_field_errors() {
        let err = AppError::validation(vec![
            FieldError::new("isbn13", "isbn13 has to be exactly 13 digits"),
            FieldError::new("category", "Category does not exist"),
        ]);

        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "isbn13");
        assert_eq!(body["errors"][1]["field"], "category");
    }

    #[test]
    fn test_question_mark_maps_to_internal() {
        fn fails() -> Result<(), AppError> {
            "not a number".parse::<i32>()?;
            Ok(())
        }

        assert_eq!(fails().unwrap_err().status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
