//! Defines the HTTP routes for authentication.
//!
//! Login and refresh are public; logout and profile require a valid access
//! token.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout).layer(middleware::from_fn(jwt_auth)))
        .route("/me", get(me).layer(middleware::from_fn(jwt_auth)))
}
