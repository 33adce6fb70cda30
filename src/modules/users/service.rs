use anyhow::anyhow;
use bookshelf_core::file_storage::{AvatarImage, AvatarStorage};
use bookshelf_core::password::spawn_hash_password;
use bookshelf_core::{AppError, Window};
use bookshelf_db::UserStore;
use bookshelf_models::{UpdateProfileRequest, User, UserChanges, UserId};
use tracing::instrument;

use crate::metrics::track_avatar_uploaded;

pub const USER_NOT_FOUND: &str = "User not found";

pub struct UserService;

impl UserService {
    #[instrument(skip(store))]
    pub async fn list<S>(store: &S, window: Window) -> Result<Vec<User>, AppError>
    where
        S: UserStore + ?Sized,
    {
        Ok(store.list_users(window).await?)
    }

    #[instrument(skip(store))]
    pub async fn get<S>(store: &S, id: UserId) -> Result<User, AppError>
    where
        S: UserStore + ?Sized,
    {
        store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!(USER_NOT_FOUND)))
    }

    /// Applies the supplied fields; a new password is rehashed.
    #[instrument(skip(store, dto))]
    pub async fn update_profile<S>(
        store: &S,
        id: UserId,
        dto: UpdateProfileRequest,
    ) -> Result<User, AppError>
    where
        S: UserStore + ?Sized,
    {
        let password_hash = match dto.password {
            Some(password) => Some(spawn_hash_password(password).await?),
            None => None,
        };

        let changes = UserChanges {
            name: dto.name,
            password_hash,
        };

        if changes.is_empty() {
            return Self::get(store, id).await;
        }

        store
            .update_user(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!(USER_NOT_FOUND)))
    }

    /// Hands the image to avatar storage and records the returned URL.
    #[instrument(skip(store, avatars, image), fields(bytes = image.bytes.len()))]
    pub async fn update_avatar<S>(
        store: &S,
        avatars: &dyn AvatarStorage,
        id: UserId,
        image: AvatarImage,
    ) -> Result<User, AppError>
    where
        S: UserStore + ?Sized,
    {
        let size = image.bytes.len();

        let url = avatars.upload(image).await.map_err(|e| match e {
            e if e.is_rejection() => AppError::field("image", e.to_string()),
            other => AppError::internal(other),
        })?;

        let user = store
            .set_avatar(id, &url)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!(USER_NOT_FOUND)))?;

        track_avatar_uploaded(size);
        tracing::info!(user_id = %id, url = %url, "Avatar updated");

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryAvatarStorage, MemoryStore};
    use bookshelf_core::file_storage::{ImageKind, StorageError};

    #[tokio::test]
    async fn test_empty_profile_update_returns_current_user() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice123", "s3cret!").await;

        let updated = UserService::update_profile(
            &store,
            user.id,
            UpdateProfileRequest {
                name: None,
                password: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated, user);
    }

    #[tokio::test]
    async fn test_rejected_avatar_is_a_field_error() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice123", "s3cret!").await;
        let avatars = MemoryAvatarStorage::with_max_size(4);

        let err = UserService::update_avatar(
            &store,
            &avatars,
            user.id,
            AvatarImage::new(vec![0; 8], ImageKind::Png),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.details[0].field, "image");
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice123", "s3cret!").await;
        let avatars = MemoryAvatarStorage::failing();

        let err = UserService::update_avatar(
            &store,
            &avatars,
            user.id,
            AvatarImage::new(vec![1, 2, 3], ImageKind::Jpeg),
        )
        .await
        .unwrap_err();

        assert!(err.status.is_server_error());
    }

    #[test]
    fn test_storage_error_classification() {
        assert!(StorageError::Empty.is_rejection());
        assert!(!StorageError::InvalidKey("../x".into()).is_rejection());
    }
}
