use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::utils::{ApiError, JwtUtil};

#[derive(Clone)]
pub struct AuthState {
    pub jwt_util: Arc<JwtUtil>,
    pub db: SqlitePool,
}

/// Resolved caller identity, inserted into request extensions for
/// downstream handlers.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
}

/// Authentication middleware.
/// 1. Verify the bearer JWT
/// 2. Confirm the user row still exists (a token outlives account
///    deletion; a deleted identity must get 401, not a ghost session)
/// 3. Insert `AuthContext` into request extensions
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let uri_full = req.uri().to_string();
    let uri = uri_full.split('?').next().unwrap_or(&uri_full).to_string();
    let method = req.method().to_string();

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing authorization header for {} {}", method, uri);
            ApiError::unauthorized("Missing authorization header")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid authorization header format for {} {}", method, uri);
        ApiError::unauthorized("Invalid authorization header format")
    })?;

    let claims = state.jwt_util.verify_token(token).map_err(|err| {
        tracing::warn!("JWT verification failed for {} {}: {}", method, uri, err);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| ApiError::unauthorized("Invalid token subject"))?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;

    if exists.is_none() {
        tracing::warn!(
            "Token for user {} references a deleted account ({} {})",
            user_id,
            method,
            uri
        );
        return Err(ApiError::unauthorized("Account no longer exists"));
    }

    tracing::debug!(
        "Authenticated user {} (ID: {}) on {} {}",
        claims.username,
        user_id,
        method,
        uri
    );

    req.extensions_mut()
        .insert(AuthContext { user_id, username: claims.username.clone() });

    Ok(next.run(req).await)
}
