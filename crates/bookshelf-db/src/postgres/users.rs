use async_trait::async_trait;
use bookshelf_core::Window;
use bookshelf_models::{NewUser, User, UserChanges, UserCredentials, UserId};
use tracing::instrument;

use super::{PgStore, map_write_error};
use crate::store::{StoreError, UserStore};

const USER_COLUMNS: &str = "id, username, name, img_path";

#[async_trait]
impl UserStore for PgStore {
    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password, name, img_path)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.img_path)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, password AS password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        Ok(credentials)
    }

    #[instrument(skip(self))]
    async fn list_users(&self, window: Window) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(window.offset)
        .bind(window.limit)
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    #[instrument(skip(self, changes))]
    async fn update_user(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 password = COALESCE($3, password)
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.password_hash)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn set_avatar(&self, id: UserId, img_path: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET img_path = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(img_path)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }
}
