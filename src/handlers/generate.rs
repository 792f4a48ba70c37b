//! Generation endpoint
//!
//! POST /api/generate: compose a prompt from the caller's input, run
//! one inference call, persist the exchange, return the text.

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::AppState;
use crate::middleware::AuthContext;
use crate::services::assistant::{AssistantError, GenerateRequest, GenerateResponse};
use crate::utils::ApiJson;

/// Generate a reply or summary for pasted email text
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Missing or malformed input"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Inference call failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Generation"
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<impl IntoResponse, AssistantApiError> {
    let outcome = state.assistant_service.generate(ctx.user_id, &req).await?;

    if !outcome.persisted {
        tracing::warn!(
            "Returning unpersisted generation result to user {} (history entry missing)",
            ctx.user_id
        );
    }

    Ok(Json(GenerateResponse { response: outcome.response }))
}

// ============================================================================
// Error Handling
// ============================================================================

pub struct AssistantApiError(AssistantError);

impl From<AssistantError> for AssistantApiError {
    fn from(err: AssistantError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AssistantApiError {
    fn into_response(self) -> axum::response::Response {
        // Upstream detail goes to the log only; callers get a short
        // generic message.
        let (status, message) = match &self.0 {
            AssistantError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            },
            AssistantError::ApiKeyMissing => {
                tracing::error!("LLM API key not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate AI response. Please check your API key.".to_string(),
                )
            },
            AssistantError::Upstream(detail) => {
                tracing::error!("LLM API error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate AI response".to_string())
            },
            AssistantError::Timeout(secs) => {
                tracing::error!("LLM call timed out after {}s", secs);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate AI response".to_string())
            },
            AssistantError::RateLimited(retry_after) => {
                tracing::error!("LLM provider rate limited, retry after {}s", retry_after);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate AI response".to_string())
            },
            AssistantError::Parse(detail) => {
                tracing::error!("LLM response parsing error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate AI response".to_string())
            },
            AssistantError::Database(err) => {
                tracing::error!("Assistant database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal database error".to_string())
            },
        };

        let body = Json(serde_json::json!({
            "error": message,
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
