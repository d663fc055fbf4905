//! Defines the HTTP routes for administrator management.

use super::handlers::{create_admin, delete_admin, get_admin, list_admins, update_admin};
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn admin_router() -> Router {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route(
            "/{id}",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
        .route_layer(middleware::from_fn(jwt_auth))
}
