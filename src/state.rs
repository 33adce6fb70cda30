use std::sync::Arc;

use bookshelf_config::{AppConfig, CorsConfig, JwtConfig, ServerConfig, StorageConfig};
use bookshelf_core::file_storage::{AvatarStorage, LocalAvatarStorage};
use bookshelf_core::{AppError, PageUrl};
use bookshelf_db::{PgStore, Store, init_db_pool, run_migrations};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub avatars: Arc<dyn AvatarStorage>,
    pub jwt_config: JwtConfig,
    pub server_config: ServerConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn Store>, avatars: Arc<dyn AvatarStorage>) -> Self {
        Self {
            store,
            avatars,
            jwt_config: config.jwt.clone(),
            server_config: config.server.clone(),
            cors_config: config.cors.clone(),
            storage_config: config.storage.clone(),
        }
    }

    /// Link builder for a list endpoint mounted at `path`.
    pub fn page_url(&self, path: &str) -> Result<PageUrl, AppError> {
        Ok(PageUrl::new(&self.server_config.public_url, path)?)
    }
}

/// Connects to PostgreSQL, applies pending migrations and wires the local
/// avatar directory.
pub async fn init_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = init_db_pool(&config.database).await?;
    run_migrations(&pool).await?;

    let avatars = LocalAvatarStorage::with_max_size(
        config.storage.upload_dir.clone(),
        config.storage.public_url.clone(),
        config.storage.max_avatar_bytes,
    );

    Ok(AppState::new(
        config,
        Arc::new(PgStore::new(pool)),
        Arc::new(avatars),
    ))
}
