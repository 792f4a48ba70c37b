//! Reply history endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::AppState;
use crate::middleware::AuthContext;
use crate::utils::{ApiError, ApiResult};

/// List the caller's history, newest first
#[utoipa::path(
    get,
    path = "/api/replies",
    responses(
        (status = 200, description = "Reply history", body = [crate::services::Reply]),
        (status = 401, description = "No valid session")
    ),
    security(("bearer_auth" = [])),
    tag = "Replies"
)]
pub async fn list_replies(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<impl IntoResponse> {
    let replies = state
        .assistant_service
        .list_replies(ctx.user_id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to list replies for user {}: {}", ctx.user_id, err);
            ApiError::internal_error("Failed to load history")
        })?;

    Ok(Json(replies))
}

/// Delete one history entry owned by the caller
#[utoipa::path(
    delete,
    path = "/api/replies/{id}",
    params(("id" = String, Path, description = "Reply ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "No valid session"),
        (status = 404, description = "No such entry for this user")
    ),
    security(("bearer_auth" = [])),
    tag = "Replies"
)]
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .assistant_service
        .delete_reply(ctx.user_id, &id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to delete reply {} for user {}: {}", id, ctx.user_id, err);
            ApiError::internal_error("Failed to delete entry")
        })?;

    if !deleted {
        return Err(ApiError::not_found("Reply not found"));
    }

    Ok(axum::http::StatusCode::NO_CONTENT)
}
