//! Password hashing with bcrypt.
//!
//! Hashes use a fixed work factor of [`HASH_COST`]. Each call draws a fresh
//! salt, so hashing the same password twice yields different strings.
//! Hashing is the most expensive step of login and registration; request
//! handlers go through [`spawn_hash_password`] / [`spawn_verify_password`]
//! so the work runs on the blocking pool instead of a runtime worker.

use anyhow::anyhow;
use bcrypt::{hash, verify};

use crate::errors::AppError;

pub const HASH_COST: u32 = 11;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

/// Returns `false` for a wrong password and for a hash that cannot be
/// parsed; it never errors.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be checked");
            false
        }
    }
}

pub async fn spawn_hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(AppError::internal)?
}

pub async fn spawn_verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(AppError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_uses_configured_cost() {
        let hashed = hash_password("s3cret!").unwrap();
        let parts: Vec<&str> = hashed.split('$').collect();

        assert_eq!(parts[2], "11");
    }

    #[tokio::test]
    async fn test_spawned_hash_verifies() {
        let hashed = spawn_hash_password("s3cret!".to_string()).await.unwrap();

        assert!(
            spawn_verify_password("s3cret!".to_string(), hashed.clone())
                .await
                .unwrap()
        );
        assert!(
            !spawn_verify_password("other".to_string(), hashed)
                .await
                .unwrap()
        );
    }
}
