//! Defines the HTTP routes for session management.

use super::handlers::{cleanup_sessions, list_sessions, revoke_all_sessions, revoke_session};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

pub fn session_router() -> Router {
    Router::new()
        .route("/", get(list_sessions))
        .route("/revoke-all", post(revoke_all_sessions))
        .route("/cleanup", post(cleanup_sessions))
        .route("/{id}", delete(revoke_session))
        .route_layer(middleware::from_fn(jwt_auth))
}
