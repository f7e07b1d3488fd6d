//! Shared helpers for endpoint tests

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use stockroom_auth::JwtManager;
use stockroom_db::{Database, SqlitePoolOptions};

use crate::routes::create_router;
use crate::state::{AppState, UploadsConfig};

/// Build a router over a fresh in-memory database.
///
/// The pool is capped at one connection: each new connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub(crate) async fn test_app() -> (Router, AppState) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    let db = Database::from_pool(pool).await.expect("run migrations");

    let jwt = Arc::new(JwtManager::new("test-secret-key", 24));
    let uploads = Some(UploadsConfig {
        cloud_name: "demo".to_string(),
        api_key: "123456".to_string(),
        api_secret: "test-api-secret".to_string(),
    });

    let state = AppState::new(db, jwt, uploads);
    (create_router(state.clone()), state)
}

/// Fire one request at the router and decode the JSON response
pub(crate) async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse response body")
    };

    (status, value)
}

/// Register an administrator through the public endpoint, returning
/// the issued session token
pub(crate) async fn register_admin(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": password,
            "confirmPassword": password
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().expect("token in response").to_string()
}
