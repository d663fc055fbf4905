//! Administrator accounts and session lifecycle service.
//!
//! Exposes the building blocks used by the binary and the integration tests:
//! configuration, database setup, the services, and [`app`] which assembles
//! the complete axum router.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
mod repositories;
pub mod services;
pub mod utils;

use crate::api::common::{ApiError, ApiResponse, service_error_to_http};
use crate::config::Config;
use crate::errors::ServiceError;
use axum::{Extension, Router, response::Json, routing::get};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "admin-microservice";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Builds the application router with every route and shared extension.
pub fn app(pool: SqlitePool, config: Arc<Config>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/helper", get(helper_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .nest("/api/admins", api::admin::routes::admin_router())
        .nest("/api/sessions", api::session::routes::session_router())
        .layer(Extension(pool))
        .layer(Extension(config))
}

async fn health_handler(
    Extension(pool): Extension<SqlitePool>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| service_error_to_http(ServiceError::from(anyhow::Error::from(e))))?;

    Ok(Json(ApiResponse::success(
        json!({ "status": "healthy", "database": "connected" }),
        "Service is healthy",
    )))
}

async fn helper_handler() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        json!({
            "version": SERVICE_VERSION,
            "service": SERVICE_NAME,
        }),
        "Admin microservice is running",
    ))
}
