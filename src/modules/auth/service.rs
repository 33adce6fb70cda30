use bookshelf_auth::issue_token;
use bookshelf_config::JwtConfig;
use bookshelf_core::password::{spawn_hash_password, spawn_verify_password};
use bookshelf_core::AppError;
use bookshelf_db::{StoreError, UserStore};
use bookshelf_models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, User};
use tracing::instrument;

use crate::metrics::{track_jwt_issued, track_user_login_failure, track_user_login_success};

pub const USERNAME_TAKEN: &str = "This username is already taken please choose another one";
pub const NO_SUCH_USER: &str = "No such user";
pub const INVALID_PASSWORD: &str = "Invalid password";

pub struct AuthService;

impl AuthService {
    /// Creates the account. The request has already passed its field rules.
    #[instrument(skip(store, dto), fields(username = ?dto.username))]
    pub async fn register<S>(store: &S, dto: RegisterRequest) -> Result<User, AppError>
    where
        S: UserStore + ?Sized,
    {
        let username = dto.username.unwrap_or_default();
        let password = dto.password.unwrap_or_default();

        if store.username_exists(&username).await? {
            return Err(AppError::conflict(USERNAME_TAKEN));
        }

        let password_hash = spawn_hash_password(password).await?;

        let user = store
            .create_user(NewUser {
                username,
                password_hash,
                name: dto.name.unwrap_or_default(),
                img_path: dto.img_path,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::conflict(USERNAME_TAKEN),
                other => AppError::internal(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    #[instrument(skip(store, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login<S>(
        store: &S,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError>
    where
        S: UserStore + ?Sized,
    {
        let Some(credentials) = store.find_credentials(&dto.username).await? else {
            track_user_login_failure("unknown_user");
            return Err(AppError::unauthorized(NO_SUCH_USER));
        };

        if !spawn_verify_password(dto.password, credentials.password_hash).await? {
            track_user_login_failure("invalid_password");
            return Err(AppError::unauthorized(INVALID_PASSWORD));
        }

        let token = issue_token(credentials.id, jwt_config)?;

        track_user_login_success();
        track_jwt_issued();

        Ok(LoginResponse { token })
    }
}
