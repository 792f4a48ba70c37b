//! Account deletion endpoint

use axum::{Extension, Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::AppState;
use crate::middleware::AuthContext;
use crate::services::AccountError;
use crate::utils::{ApiError, ApiResult};

/// Delete the caller's account and all their data
///
/// Acts only on the authenticated identity. The session token is not
/// invalidated server-side; it dies naturally because the middleware
/// re-checks the users table, so a repeat call gets 401.
#[utoipa::path(
    delete,
    path = "/api/account",
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Identity deletion failed; data may be partially removed")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<impl IntoResponse> {
    state
        .account_service
        .delete_account(ctx.user_id)
        .await
        .map_err(|err: AccountError| {
            tracing::error!("Account deletion failed for user {}: {}", ctx.user_id, err);
            ApiError::internal_error(
                "Failed to delete account. Some data may already have been removed. \
                 Please contact support.",
            )
        })?;

    Ok(Json(serde_json::json!({
        "message": "Account deleted successfully"
    })))
}
