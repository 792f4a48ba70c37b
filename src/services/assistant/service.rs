//! Assistant Service - orchestrates the generation flow
//!
//! validate → build prompt → inference call → persist → respond, in
//! that order, with no retries. An upstream failure is terminal for
//! the request and persists nothing; a persistence failure after a
//! successful inference call is logged and swallowed so the caller
//! still gets the generated text.

use std::sync::Arc;

use super::client::InferenceClient;
use super::models::{
    ActionType, AssistantError, GenerateRequest, GenerationOutcome, Reply, Tone,
};
use super::prompt::build_prompt;
use super::repository::ReplyRepository;

/// Substituted when the provider answers successfully but returns no
/// completion text. Generation partially succeeded, so the request is
/// not failed outright.
const EMPTY_COMPLETION_PLACEHOLDER: &str = "No response generated";

pub struct AssistantService {
    repository: ReplyRepository,
    client: Arc<dyn InferenceClient>,
}

impl AssistantService {
    pub fn new(pool: sqlx::SqlitePool, client: Arc<dyn InferenceClient>) -> Self {
        Self { repository: ReplyRepository::new(pool), client }
    }

    /// Run one generation for an authenticated user.
    ///
    /// Validation happens before any external call so malformed input
    /// never spends upstream quota.
    pub async fn generate(
        &self,
        user_id: i64,
        req: &GenerateRequest,
    ) -> Result<GenerationOutcome, AssistantError> {
        if req.email_text.trim().is_empty() {
            return Err(AssistantError::InvalidRequest("emailText must not be empty".to_string()));
        }

        let action = ActionType::parse(&req.action).ok_or_else(|| {
            AssistantError::InvalidRequest(format!(
                "action must be \"reply\" or \"summarize\", got \"{}\"",
                req.action
            ))
        })?;

        // Tone only applies to replies; a summarize row stores NULL no
        // matter what the caller sent.
        let tone = match action {
            ActionType::Reply => req.tone.as_deref().and_then(Tone::parse),
            ActionType::Summarize => None,
        };

        let prompt = build_prompt(action, tone, &req.email_text);

        let response = self
            .client
            .complete(&prompt)
            .await?
            .unwrap_or_else(|| EMPTY_COMPLETION_PLACEHOLDER.to_string());

        let persisted = match self
            .repository
            .insert(user_id, &req.email_text, &response, action, tone)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                // Availability over durability: the user still gets
                // their text, only the history entry is missing.
                tracing::error!("Failed to persist reply for user {}: {}", user_id, err);
                false
            },
        };

        Ok(GenerationOutcome { response, persisted })
    }

    /// History for one user, newest first.
    pub async fn list_replies(&self, user_id: i64) -> Result<Vec<Reply>, AssistantError> {
        self.repository.list_for_user(user_id).await
    }

    /// Delete one history row owned by `user_id`.
    pub async fn delete_reply(&self, user_id: i64, reply_id: &str) -> Result<bool, AssistantError> {
        self.repository.delete_for_user(user_id, reply_id).await
    }
}
