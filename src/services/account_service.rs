//! Account deletion: best-effort history removal followed by identity
//! deletion through the elevated store.

use sqlx::SqlitePool;

use crate::services::assistant::ReplyRepository;

/// Identity deletion only, backed by the elevated connection. Kept as
/// a separate type from the scoped reply store so the privilege
/// boundary is visible at the type level: no handler reaches the admin
/// pool except through this store, and its sole input is the user id
/// taken from the validated session.
pub struct AdminIdentityStore {
    admin_pool: SqlitePool,
}

impl AdminIdentityStore {
    pub fn new(admin_pool: SqlitePool) -> Self {
        Self { admin_pool }
    }

    /// Remove the user row. Zero rows affected means the identity was
    /// already gone, which the caller treats as failure.
    pub async fn delete_user(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.admin_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Identity deletion failed; user data may already be partially
    /// removed (the two stores are independent, deletion is not
    /// transactional across them).
    #[error("Failed to delete account")]
    DeletionFailed,
}

pub struct AccountService {
    replies: ReplyRepository,
    identity_store: AdminIdentityStore,
}

impl AccountService {
    pub fn new(pool: SqlitePool, identity_store: AdminIdentityStore) -> Self {
        Self { replies: ReplyRepository::new(pool), identity_store }
    }

    /// Delete the caller's data and then their identity.
    ///
    /// The history pre-delete is best-effort: the schema cascade on
    /// `replies.user_id` cleans up whatever it misses, so a failure
    /// here is logged and the identity deletion proceeds. Identity
    /// deletion is the primary effect and the only fatal step.
    pub async fn delete_account(&self, user_id: i64) -> Result<(), AccountError> {
        match self.replies.delete_all_for_user(user_id).await {
            Ok(deleted) => {
                tracing::info!("Deleted {} replies for user {}", deleted, user_id);
            },
            Err(err) => {
                tracing::error!(
                    "Failed to delete replies for user {} (continuing, cascade will clean up): {}",
                    user_id,
                    err
                );
            },
        }

        match self.identity_store.delete_user(user_id).await {
            Ok(true) => {
                tracing::info!("Deleted account for user {}", user_id);
                Ok(())
            },
            Ok(false) => {
                tracing::error!("Account deletion found no user row for {}", user_id);
                Err(AccountError::DeletionFailed)
            },
            Err(err) => {
                tracing::error!("Failed to delete user {}: {}", user_id, err);
                Err(AccountError::DeletionFailed)
            },
        }
    }
}
