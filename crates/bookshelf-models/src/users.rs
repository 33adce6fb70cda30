use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::validators::validate_not_blank;

/// A user as exposed to clients. The password hash lives in
/// [`UserCredentials`] and is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub img_path: Option<String>,
}

/// What login needs to check a password.
#[derive(Clone, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub img_path: Option<String>,
}

/// Partial profile update; `None` leaves a column unchanged.
#[derive(Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password_hash.is_none()
    }
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        required(message = "Username has to be a string of length 3 or more"),
        length(min = 3, message = "Username has to be a string of length 3 or more")
    )]
    #[schema(example = "alice123", min_length = 3)]
    pub username: Option<String>,
    #[validate(
        required(message = "Password has to be a string of length 6 or more"),
        length(min = 6, message = "Password has to be a string of length 6 or more")
    )]
    #[schema(example = "s3cret!", min_length = 6)]
    pub password: Option<String>,
    pub name: Option<String>,
    pub img_path: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 6, message = "Password has to be a string of length 6 or more"))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::FieldErrors;
    use serde_json::json;

    fn register(body: serde_json::Value) -> Vec<String> {
        let dto: RegisterRequest = serde_json::from_value(body).unwrap();
        FieldErrors::from_validation(dto.validate())
            .iter()
            .map(|e| e.field.clone())
            .collect()
    }

    #[test]
    fn test_register_accepts_minimum_lengths() {
        assert!(register(json!({ "username": "bob", "password": "123456" })).is_empty());
    }

    #[test]
    fn test_register_reports_both_fields() {
        assert_eq!(
            register(json!({ "username": "al", "password": "123" })),
            vec!["password", "username"]
        );
    }

    #[test]
    fn test_register_missing_fields_are_errors() {
        assert_eq!(register(json!({})), vec!["password", "username"]);
    }

    #[test]
    fn test_user_serializes_camel_case_without_password() {
        let user = User {
            id: UserId(1),
            username: "alice123".into(),
            name: String::new(),
            img_path: None,
        };

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(
            json,
            json!({ "id": 1, "username": "alice123", "name": "", "imgPath": null })
        );
    }

    #[test]
    fn test_credentials_debug_hides_hash() {
        let creds = UserCredentials {
            id: UserId(1),
            username: "alice".into(),
            password_hash: "$2b$11$abcdef".into(),
        };

        assert!(!format!("{:?}", creds).contains("$2b$"));
    }

    #[test]
    fn test_profile_update_rules() {
        let ok = UpdateProfileRequest {
            name: Some("Alice".into()),
            password: None,
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateProfileRequest {
            name: Some("  ".into()),
            password: Some("123".into()),
        };
        let fields: Vec<String> = FieldErrors::from_validation(bad.validate())
            .iter()
            .map(|e| e.field.clone())
            .collect();
        assert_eq!(fields, vec!["name", "password"]);
    }
}
