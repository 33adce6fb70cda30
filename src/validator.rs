//! Request body and path extractors that turn malformed input into the
//! API's 400 responses.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use bookshelf_core::{AppError, FieldError, FieldErrors};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

pub const INVALID_JSON_MESSAGE: &str = "Invalid json";
pub const INVALID_ID_MESSAGE: &str = "ID has to be a number bigger than 0";

/// JSON body that has passed its `validator` rules. Fields of the wrong JSON
/// type are reported in the same list as rule violations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let CheckedJson(value, mistyped) = CheckedJson::<T>::from_request(req, state).await?;

        mistyped
            .with_rules(FieldErrors::from_validation(value.validate()))
            .into_result()?;

        Ok(ValidatedJson(value))
    }
}

/// JSON body parsed field by field. Fields of the wrong JSON type are
/// dropped (they read as absent) and listed in the second element, so the
/// handler can report them together with its own checks.
#[derive(Debug, Clone, Default)]
pub struct CheckedJson<T>(pub T, pub FieldErrors);

impl<T, S> FromRequest<S> for CheckedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(reject_json)?;

        let (parsed, mistyped) = parse_fields(value)?;

        Ok(CheckedJson(parsed, mistyped))
    }
}

/// Retries deserialization without each mistyped top-level field until it
/// succeeds. Terminates because every round removes one key.
fn parse_fields<T: DeserializeOwned>(mut value: Value) -> Result<(T, FieldErrors), AppError> {
    let mut mistyped = FieldErrors::new();

    loop {
        let bytes = serde_json::to_vec(&value)?;
        let error = match Json::<T>::from_bytes(&bytes) {
            Ok(Json(parsed)) => return Ok((parsed, mistyped)),
            Err(JsonRejection::JsonDataError(err)) => data_error_field(&err.body_text()),
            Err(other) => return Err(reject_json(other)),
        };

        let dropped = value
            .as_object_mut()
            .is_some_and(|fields| fields.remove(&error.field).is_some());
        mistyped.push(error.field, error.message);

        if !dropped {
            return Err(AppError::validation(mistyped.into_inner()));
        }
    }
}

/// JSON body that is only parsed; the first type error rejects it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject_json)?;

        Ok(JsonBody(value))
    }
}

fn reject_json(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => AppError::validation(vec![data_error_field(
            &err.body_text(),
        )]),
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request(anyhow!("Missing 'Content-Type: application/json' header"))
        }
        _ => AppError::bad_request(anyhow!(INVALID_JSON_MESSAGE)),
    }
}

/// Query string whose parse failures answer with the JSON error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(anyhow!(e.body_text())))?;

        Ok(QueryParams(value))
    }
}

/// Pulls the offending field out of a deserialization message such as
/// "Failed to deserialize the JSON body into the target type: pagecount:
/// invalid type: string "many", expected i32 at line 1 column 20".
fn data_error_field(body: &str) -> FieldError {
    let detail = body
        .split_once("target type: ")
        .map(|(_, detail)| detail)
        .unwrap_or(body);

    if let Some(field) = detail
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return FieldError::new(field, format!("{} is required", field));
    }

    match detail.split_once(": ") {
        Some((path, reason)) if !path.is_empty() && path != "." && !path.contains(' ') => {
            FieldError::new(path, type_message(path, &strip_position(reason)))
        }
        _ => FieldError::new("body", strip_position(detail)),
    }
}

fn type_message(field: &str, reason: &str) -> String {
    let expected = reason.rsplit("expected ").next().unwrap_or(reason);
    let kind = match expected {
        "a string" => "a string",
        "a boolean" => "a boolean",
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "isize" | "usize" => {
            "an integer"
        }
        _ => return reason.to_string(),
    };
    format!("{} has to be {}", field, kind)
}

fn strip_position(message: &str) -> String {
    message
        .split(" at line ")
        .next()
        .unwrap_or(message)
        .to_string()
}

/// A positive integer id taken from the single path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i32);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow!(INVALID_ID_MESSAGE)))?;

        parse_id(&raw).map(PathId)
    }
}

pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::bad_request(anyhow!(INVALID_ID_MESSAGE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
    }

    #[test]
    fn test_data_error_with_path() {
        let field = data_error_field(
            "Failed to deserialize the JSON body into the target type: pagecount: invalid type: string \"many\", expected i32 at line 1 column 20",
        );

        assert_eq!(field.field, "pagecount");
        assert_eq!(field.message, "pagecount has to be an integer");
    }

    #[test]
    fn test_type_message_names_expected_kind() {
        assert_eq!(
            type_message("username", "invalid type: integer `12`, expected a string"),
            "username has to be a string"
        );
        assert_eq!(
            type_message("when", "invalid type: string \"x\", expected a date"),
            "invalid type: string \"x\", expected a date"
        );
    }

    #[derive(Debug, serde::Deserialize)]
    struct Signup {
        username: Option<String>,
        password: Option<String>,
        age: Option<i32>,
    }

    #[test]
    fn test_parse_fields_drops_every_mistyped_field() {
        let (parsed, mistyped) = parse_fields::<Signup>(serde_json::json!({
            "username": 12,
            "password": "secret",
            "age": "old"
        }))
        .unwrap();

        assert_eq!(parsed.username, None);
        assert_eq!(parsed.password.as_deref(), Some("secret"));
        assert_eq!(parsed.age, None);

        let fields: Vec<&str> = mistyped.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains(&"username") && fields.contains(&"age"));
    }

    #[test]
    fn test_parse_fields_rejects_non_object() {
        let err = parse_fields::<Signup>(serde_json::json!("text")).unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.details[0].field, "body");
    }

    #[test]
    fn test_data_error_missing_field() {
        let field = data_error_field(
            "Failed to deserialize the JSON body into the target type: missing field `password` at line 1 column 22",
        );

        assert_eq!(field, FieldError::new("password", "password is required"));
    }

    #[test]
    fn test_data_error_without_path() {
        let field = data_error_field(
            "Failed to deserialize the JSON body into the target type: invalid type: sequence, expected struct LoginRequest at line 1 column 0",
        );

        assert_eq!(field.field, "body");
    }
}
