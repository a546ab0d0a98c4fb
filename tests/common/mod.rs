//! Shared harness for integration tests: a fresh on-disk SQLite store per
//! test and the real router.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use book_catalog::config::{Config, SecurityConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-test-password";
pub const JWT_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    let db_path =
        std::env::temp_dir().join(format!("book-catalog-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.database.url = Some(format!("sqlite:{}", db_path.display()));
    config.database.max_connections = 5;
    config.auth.jwt_secret = Some(JWT_SECRET.to_string());
    config.auth.admin_username = ADMIN_USERNAME.to_string();
    config.auth.admin_password = Some(ADMIN_PASSWORD.to_string());
    config.security = SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    };
    config
}

pub async fn spawn_state() -> Arc<book_catalog::api::AppState> {
    let config = test_config();
    let state = book_catalog::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    state
        .store()
        .bootstrap_admin(&state.config().auth, &state.config().security)
        .await
        .expect("failed to seed admin");

    state
}

pub async fn spawn_app() -> Router {
    book_catalog::api::router(spawn_state().await)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

pub async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/users/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await
}

pub async fn admin_token(app: &Router) -> String {
    let (status, body) = login(app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}
