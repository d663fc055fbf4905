//! Shared helpers for the HTTP-level integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use admin_session_service::config::Config;
use admin_session_service::database::MIGRATOR;
use admin_session_service::database::models::{AdminView, CreateAdmin};
use admin_session_service::services::admin_service::AdminService;
use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "Test1234";

/// Configuration with a cheap bcrypt cost and a fixed secret.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        acquire_timeout_seconds: 3,
        jwt_secret: "integration-test-secret".to_string(),
        access_token_expires_in_seconds: 3600,
        refresh_token_expires_in_days: 30,
        bcrypt_cost: 4,
        session_cleanup_interval_seconds: 3600,
        server_port: 0,
        bootstrap_admin: None,
    }
}

/// Fresh in-memory database with migrations applied.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database should open");
    MIGRATOR
        .run(&pool)
        .await
        .expect("migrations should apply");
    pool
}

/// Application router wired the same way `main.rs` wires it.
pub fn build_test_app(pool: SqlitePool) -> Router {
    admin_session_service::app(pool, Arc::new(test_config()))
}

/// Insert an administrator directly through the service layer.
pub async fn create_test_admin(pool: &SqlitePool, username: &str) -> AdminView {
    AdminService::new(pool, test_config().bcrypt_cost)
        .create(CreateAdmin {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: TEST_PASSWORD.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: "admin".to_string(),
            is_active: true,
        })
        .await
        .expect("admin creation should succeed")
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).expect("request should build"))
        .await
        .expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Log in through the API and return the `data` object of the envelope.
pub async fn login(app: Router, username: &str) -> Value {
    let response = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({
            "email": format!("{username}@example.com"),
            "password": TEST_PASSWORD,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["data"].clone()
}
