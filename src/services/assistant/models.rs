//! Assistant Data Models
//!
//! Core data structures for the generation flow: the persisted reply
//! record, request/response DTOs, and the service error type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// ============================================================================
// Action and Tone
// ============================================================================

/// What the caller wants done with the pasted email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Reply,
    Summarize,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::Summarize => "summarize",
        }
    }

    /// Parse a caller-supplied action. Unrecognized values are rejected
    /// up front so no upstream quota is spent on them.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reply" => Some(Self::Reply),
            "summarize" => Some(Self::Summarize),
            _ => None,
        }
    }
}

/// Requested voice for a generated reply. Only meaningful when the
/// action is `reply`; summaries ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Friendly,
    Professional,
    Concise,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Professional => "professional",
            Self::Concise => "concise",
        }
    }

    /// Unrecognized tone strings map to None; the prompt builder then
    /// falls back to the documented default (concise).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "friendly" => Some(Self::Friendly),
            "professional" => Some(Self::Professional),
            "concise" => Some(Self::Concise),
            _ => None,
        }
    }
}

// ============================================================================
// Reply Record
// ============================================================================

/// One persisted input/output exchange. Immutable after creation; the
/// only mutation path is deletion.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Reply {
    pub id: String,
    pub user_id: i64,
    pub original_email: String,
    pub ai_response: String,
    pub action_type: String,
    pub tone: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

/// Body of `POST /api/generate`. Field names follow the client's
/// camelCase convention.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub email_text: String,
    /// "reply" or "summarize"
    pub action: String,
    /// "friendly", "professional" or "concise"; optional
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub response: String,
}

/// Result of a generation: the text to hand back plus whether the
/// history row made it to the store. Persistence failure is explicitly
/// non-fatal; the flag keeps that contract visible instead of burying
/// it in control flow.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub response: String,
    pub persisted: bool,
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the generation flow.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("LLM API key not configured")]
    ApiKeyMissing,

    #[error("LLM API error: {0}")]
    Upstream(String),

    #[error("LLM response parsing error: {0}")]
    Parse(String),

    #[error("LLM timeout after {0}s")]
    Timeout(u64),

    #[error("LLM rate limited, retry after {0}s")]
    RateLimited(u64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
