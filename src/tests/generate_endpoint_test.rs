// End-to-end tests for the generation and account endpoints over the
// real router, with the inference call mocked out.

use crate::middleware::{AuthState, auth::auth_middleware};
use crate::services::assistant::AssistantError;
use crate::services::{
    AccountService, AdminIdentityStore, AssistantService, AuthService, InferenceClient,
};
use crate::tests::common::{count_replies, create_test_db, create_test_jwt, create_test_user};
use crate::{AppState, handlers};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware as axum_middleware,
    routing::{delete, post},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::util::ServiceExt;

struct StubInference {
    calls: AtomicUsize,
    text: String,
}

impl StubInference {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), text: text.to_string() })
    }
}

#[async_trait]
impl InferenceClient for StubInference {
    async fn complete(&self, _prompt: &str) -> Result<Option<String>, AssistantError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.text.clone()))
    }
}

fn build_app(pool: SqlitePool, inference: Arc<StubInference>) -> Router {
    let jwt_util = create_test_jwt();

    let state = Arc::new(AppState {
        jwt_util: Arc::clone(&jwt_util),
        auth_service: Arc::new(AuthService::new(pool.clone(), Arc::clone(&jwt_util))),
        assistant_service: Arc::new(AssistantService::new(pool.clone(), inference)),
        account_service: Arc::new(AccountService::new(
            pool.clone(),
            AdminIdentityStore::new(pool.clone()),
        )),
    });

    let auth_state = AuthState { jwt_util, db: pool };

    Router::new()
        .route("/api/generate", post(handlers::generate::generate))
        .route("/api/account", delete(handlers::account::delete_account))
        .route_layer(axum_middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state)
}

fn generate_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let builder = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json");
    let builder = match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    };
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}

#[tokio::test]
async fn test_generate_without_session_is_unauthorized() {
    let pool = create_test_db().await;
    let inference = StubInference::new("unused");
    let app = build_app(pool, Arc::clone(&inference));

    let response = app
        .oneshot(generate_request(
            None,
            serde_json::json!({"emailText": "Hello", "action": "reply"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // Rejected before any external call
    assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_blank_email_is_bad_request() {
    let pool = create_test_db().await;
    let jwt_util = create_test_jwt();
    let user_id = create_test_user(&pool, "alice").await;
    let token = jwt_util.generate_token(user_id, "alice").unwrap();

    let inference = StubInference::new("unused");
    let app = build_app(pool.clone(), Arc::clone(&inference));

    let response = app
        .oneshot(generate_request(
            Some(&token),
            serde_json::json!({"emailText": "   ", "action": "reply"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
    assert_eq!(count_replies(&pool, user_id).await, 0);
}

#[tokio::test]
async fn test_generate_missing_field_is_bad_request() {
    let pool = create_test_db().await;
    let jwt_util = create_test_jwt();
    let user_id = create_test_user(&pool, "alice").await;
    let token = jwt_util.generate_token(user_id, "alice").unwrap();

    let inference = StubInference::new("unused");
    let app = build_app(pool.clone(), Arc::clone(&inference));

    // No action field at all: still a 400 with the JSON error shape,
    // not the extractor's stock 422.
    let response = app
        .oneshot(generate_request(
            Some(&token),
            serde_json::json!({"emailText": "Hello"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], 400);
    assert!(body["error"].is_string());
    assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
    assert_eq!(count_replies(&pool, user_id).await, 0);
}

#[tokio::test]
async fn test_generate_returns_text_and_persists_row() {
    let pool = create_test_db().await;
    let jwt_util = create_test_jwt();
    let user_id = create_test_user(&pool, "alice").await;
    let token = jwt_util.generate_token(user_id, "alice").unwrap();

    let inference = StubInference::new("Sure, 3pm works great for me!");
    let app = build_app(pool.clone(), inference);

    let response = app
        .oneshot(generate_request(
            Some(&token),
            serde_json::json!({
                "emailText": "Can we move our meeting to 3pm?",
                "action": "reply",
                "tone": "friendly"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body, serde_json::json!({"response": "Sure, 3pm works great for me!"}));

    let row: (String, Option<String>) =
        sqlx::query_as("SELECT action_type, tone FROM replies WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(row.0, "reply");
    assert_eq!(row.1.as_deref(), Some("friendly"));
}

#[tokio::test]
async fn test_account_deletion_then_reuse_of_token_is_unauthorized() {
    let pool = create_test_db().await;
    let jwt_util = create_test_jwt();
    let user_id = create_test_user(&pool, "leaver").await;
    let token = jwt_util.generate_token(user_id, "leaver").unwrap();

    let app = build_app(pool.clone(), StubInference::new("unused"));

    let delete_request = || {
        Request::builder()
            .method("DELETE")
            .uri("/api/account")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(delete_request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let body = response_json(first).await;
    assert_eq!(body["message"], "Account deleted successfully");

    // Same token, identity gone: correct outcome is 401, not success.
    let second = app.oneshot(delete_request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
}
