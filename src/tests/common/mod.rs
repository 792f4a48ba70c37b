// Common test utilities and helpers

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::services::assistant::{ActionType, ReplyRepository, Tone};

/// Create an in-memory SQLite database for testing. Foreign keys are
/// on so cascade behavior matches production.
pub async fn create_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Failed to parse test database URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .expect("Failed to create test database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn create_test_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, 'test-hash')")
        .bind(username)
        .execute(pool)
        .await
        .expect("Failed to create test user")
        .last_insert_rowid()
}

pub async fn seed_replies(pool: &SqlitePool, user_id: i64, count: usize) {
    let repo = ReplyRepository::new(pool.clone());
    for i in 0..count {
        repo.insert(user_id, &format!("email {}", i), "text", ActionType::Reply, Some(Tone::Concise))
            .await
            .expect("Failed to seed reply");
    }
}

pub async fn count_replies(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM replies WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count replies")
}

pub fn create_test_jwt() -> Arc<crate::utils::JwtUtil> {
    Arc::new(crate::utils::JwtUtil::new("test-secret-key", "24h"))
}
