//! Custom field rules used by the request DTOs.

use std::borrow::Cow;

use validator::ValidationError;

pub fn validate_isbn13(value: &str) -> Result<(), ValidationError> {
    if value.len() == 13 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("isbn13")
            .with_message(Cow::Borrowed("isbn13 has to be exactly 13 digits")))
    }
}

/// Rejects values made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message(Cow::Borrowed("can not be blank")))
    } else {
        Ok(())
    }
}
