//! Reply Repository - scoped store for per-user reply rows
//!
//! Every operation is bound to a `user_id`; there is no way to touch
//! another user's rows through this type.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::models::{ActionType, AssistantError, Reply, Tone};

pub struct ReplyRepository {
    pool: SqlitePool,
}

impl ReplyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new reply row and return its id.
    pub async fn insert(
        &self,
        user_id: i64,
        original_email: &str,
        ai_response: &str,
        action: ActionType,
        tone: Option<Tone>,
    ) -> Result<String, AssistantError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"INSERT INTO replies
               (id, user_id, original_email, ai_response, action_type, tone)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(original_email)
        .bind(ai_response)
        .bind(action.as_str())
        .bind(tone.map(|t| t.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// History for one user, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Reply>, AssistantError> {
        sqlx::query_as::<_, Reply>(
            "SELECT * FROM replies WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AssistantError::from)
    }

    /// Delete a single row if it belongs to `user_id`. Returns whether
    /// a row was removed.
    pub async fn delete_for_user(
        &self,
        user_id: i64,
        reply_id: &str,
    ) -> Result<bool, AssistantError> {
        let result = sqlx::query("DELETE FROM replies WHERE id = ? AND user_id = ?")
            .bind(reply_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove all of a user's history. Used as the explicit pre-delete
    /// during account deletion; the schema cascade covers the rest.
    pub async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, AssistantError> {
        let result = sqlx::query("DELETE FROM replies WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
