//! Session provider: registration, login, and profile lookup.

use std::sync::Arc;

use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;

use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::utils::{ApiError, ApiResult, JwtUtil};

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    jwt_util: Arc<JwtUtil>,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt_util: Arc<JwtUtil>) -> Self {
        Self { pool, jwt_util }
    }

    pub async fn register(&self, req: RegisterRequest) -> ApiResult<LoginResponse> {
        let password_hash = hash(&req.password, DEFAULT_COST)
            .map_err(|err| ApiError::internal_error(format!("Failed to hash password: {}", err)))?;

        // The UNIQUE constraint on username is the uniqueness check; a
        // separate pre-check would leave a window where two concurrent
        // registrations both pass it.
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, email) VALUES (?, ?, ?)",
        )
        .bind(&req.username)
        .bind(&password_hash)
        .bind(&req.email)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if err.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                ApiError::conflict("Username already taken")
            } else {
                ApiError::from(err)
            }
        })?;

        let user = self.fetch_user(result.last_insert_rowid()).await?;
        let token = self.jwt_util.generate_token(user.id, &user.username)?;

        tracing::info!("Registered new user {} (ID: {})", user.username, user.id);

        Ok(LoginResponse { token, user: user.into() })
    }

    pub async fn login(&self, req: LoginRequest) -> ApiResult<LoginResponse> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(&req.username)
            .fetch_optional(&self.pool)
            .await?;

        // Same error for unknown user and wrong password.
        let user = user.ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

        let valid = verify(&req.password, &user.password_hash).map_err(|err| {
            tracing::error!("Password verification failed for user {}: {}", user.id, err);
            ApiError::internal_error("Failed to verify credentials")
        })?;

        if !valid {
            return Err(ApiError::unauthorized("Invalid username or password"));
        }

        let token = self.jwt_util.generate_token(user.id, &user.username)?;

        Ok(LoginResponse { token, user: user.into() })
    }

    pub async fn get_user(&self, user_id: i64) -> ApiResult<User> {
        self.fetch_user(user_id).await
    }

    async fn fetch_user(&self, user_id: i64) -> ApiResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}
