//! Field-level validation error lists.
//!
//! Every validation failure in the API is reported as an ordered list of
//! `{field, message}` pairs. Checks that do not depend on each other all run,
//! so a single response carries every violated rule for the given input.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::errors::AppError;

/// A single violated rule, keyed by the request field it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered accumulator of [`FieldError`]s. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts the outcome of a `validator` derive into a list.
    ///
    /// `validator` reports Rust field names; they are turned into the
    /// camelCase names the JSON bodies use. `validator` keys its errors in a
    /// hash map, so fields are emitted in name order to keep responses
    /// stable between calls. Within one field, rules keep their declaration
    /// order.
    pub fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        let Err(errors) = result else {
            return Self::new();
        };

        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| (camel_case(&field), errors))
            .collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let list = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();

        Self(list)
    }

    /// Joins type mismatches (`self`) with rule violations. A field that
    /// already has a type error is not reported again. The result is in
    /// field order.
    pub fn with_rules(mut self, rules: FieldErrors) -> Self {
        let mistyped: Vec<String> = self.0.iter().map(|e| e.field.clone()).collect();
        self.0
            .extend(rules.0.into_iter().filter(|e| !mistyped.contains(&e.field)));
        self.0.sort_by(|a, b| a.field.cmp(&b.field));
        self
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(())` when no rule was violated, otherwise a 400 validation error
    /// carrying the whole list.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0))
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 3, message = "username too short"))]
        username: String,
        #[validate(length(min = 6, message = "password too short"))]
        password: String,
    }

    #[test]
    fn test_valid_input_gives_empty_list() {
        let dto = Signup {
            username: "alice".into(),
            password: "s3cret!".into(),
        };

        assert!(FieldErrors::from_validation(dto.validate()).is_empty());
    }

    #[test]
    fn test_reports_every_violation_in_field_order() {
        let dto = Signup {
            username: "al".into(),
            password: "123".into(),
        };

        let errors = FieldErrors::from_validation(dto.validate()).into_inner();

        assert_eq!(
            errors,
            vec![
                FieldError::new("password", "password too short"),
                FieldError::new("username", "username too short"),
            ]
        );
    }

    #[derive(Validate)]
    struct LogRead {
        #[validate(range(min = 1, message = "Book id has to be a number bigger than 0"))]
        book_id: i32,
    }

    #[test]
    fn test_fields_use_json_names() {
        let errors = FieldErrors::from_validation(LogRead { book_id: 0 }.validate());

        assert_eq!(errors.iter().next().unwrap().field, "bookId");
        assert_eq!(camel_case("img_path"), "imgPath");
        assert_eq!(camel_case("isbn13"), "isbn13");
    }

    #[test]
    fn test_type_errors_replace_rules_on_same_field() {
        let mut mistyped = FieldErrors::new();
        mistyped.push("username", "username has to be a string");
        let mut rules = FieldErrors::new();
        rules.push("username", "Username has to be a string of length 3 or more");
        rules.push("password", "Password has to be a string of length 6 or more");

        let fields: Vec<String> = mistyped
            .with_rules(rules)
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();

        assert_eq!(
            fields,
            vec![
                "password: Password has to be a string of length 6 or more",
                "username: username has to be a string",
            ]
        );
    }

    #[test]
    fn test_into_result_produces_bad_request() {
        let mut errors = FieldErrors::new();
        errors.push("title", "Title is already taken");

        let err = errors.into_result().unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.details.len(), 1);
        assert_eq!(err.details[0].field, "title");
    }

    #[test]
    fn test_into_result_ok_when_empty() {
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
