// Integration tests for the auth middleware: bearer token handling and
// the deleted-account check.

use crate::middleware::{AuthState, auth::auth_middleware};
use crate::tests::common::{create_test_db, create_test_jwt, create_test_user};
use crate::utils::JwtUtil;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Mock handler that returns 200 OK
async fn mock_handler() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .body(Body::empty())
        .unwrap()
}

fn create_test_router(jwt_util: Arc<JwtUtil>, db: SqlitePool) -> Router {
    let auth_state = AuthState { jwt_util, db };

    Router::new()
        .route("/api/replies", get(mock_handler))
        .route_layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware))
}

fn request_with_token(token: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method("GET").uri("/api/replies");
    let builder = match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    };
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_header_rejected() {
    let pool = create_test_db().await;
    let app = create_test_router(create_test_jwt(), pool);

    let response = app.oneshot(request_with_token(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_header_rejected() {
    let pool = create_test_db().await;
    let app = create_test_router(create_test_jwt(), pool);

    let req = Request::builder()
        .method("GET")
        .uri("/api/replies")
        .header(header::AUTHORIZATION, "Token abcdef")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let pool = create_test_db().await;
    let app = create_test_router(create_test_jwt(), pool);

    let response = app
        .oneshot(request_with_token(Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_accepted() {
    let pool = create_test_db().await;
    let jwt_util = create_test_jwt();
    let user_id = create_test_user(&pool, "alice").await;
    let token = jwt_util.generate_token(user_id, "alice").unwrap();

    let app = create_test_router(jwt_util, pool);
    let response = app
        .oneshot(request_with_token(Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_for_deleted_account_rejected() {
    let pool = create_test_db().await;
    let jwt_util = create_test_jwt();
    let user_id = create_test_user(&pool, "ghost").await;
    let token = jwt_util.generate_token(user_id, "ghost").unwrap();

    // Account removed after the token was issued: the signature is
    // still valid but the session must be treated as dead.
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = create_test_router(jwt_util, pool);
    let response = app
        .oneshot(request_with_token(Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "mallory").await;

    let other_jwt = JwtUtil::new("some-other-secret", "24h");
    let token = other_jwt.generate_token(user_id, "mallory").unwrap();

    let app = create_test_router(create_test_jwt(), pool);
    let response = app
        .oneshot(request_with_token(Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
