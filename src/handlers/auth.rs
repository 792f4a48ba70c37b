//! Authentication endpoints

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use validator::Validate;

use crate::AppState;
use crate::middleware::AuthContext;
use crate::models::{LoginRequest, RegisterRequest, UserResponse};
use crate::utils::{ApiError, ApiJson, ApiResult};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = crate::models::LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let response = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in and obtain a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::models::LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state.auth_service.login(req).await?;
    Ok(Json(response))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "No valid session")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<impl IntoResponse> {
    let user = state.auth_service.get_user(ctx.user_id).await?;
    Ok(Json(UserResponse::from(user)))
}
