//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse request data and delegate to `auth::service` for
//! the login, refresh and logout flows.

use crate::api::common::{
    ApiError, ApiResponse, JsonBody, OptionalJsonBody, service_error_to_http,
};
use crate::auth::middleware::bearer_token;
use crate::auth::models::*;
use crate::auth::service::{AuthService, INVALID_REFRESH_TOKEN};
use crate::config::Config;
use crate::database::models::AdminView;
use crate::errors::ServiceError;
use crate::services::admin_service::AdminService;
use crate::services::session_service::ClientInfo;
use crate::utils::jwt::Claims;
use axum::{extract::Extension, http::HeaderMap, response::Json};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Handle administrator login
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    client: ClientInfo,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.login(payload, client).await {
        Ok(response) => Ok(Json(ApiResponse::success(response, "Login successful"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh.
///
/// The previous access token travels in the `Authorization` header and may
/// already be expired; the refresh token travels in the body.
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<RefreshTokenResponse>>, ApiError> {
    let access_token = bearer_token(&headers).ok_or_else(|| {
        service_error_to_http(ServiceError::authentication(INVALID_REFRESH_TOKEN))
    })?;

    let auth_service = AuthService::new(&pool, &config);

    match auth_service.refresh_token(access_token, payload).await {
        Ok(response) => Ok(Json(ApiResponse::success(
            response,
            "Token refreshed successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout. Succeeds whether or not a session was revoked.
pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Extension(claims): Extension<Claims>,
    OptionalJsonBody(payload): OptionalJsonBody<LogoutRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let auth_service = AuthService::new(&pool, &config);

    let revoked = auth_service
        .logout(payload)
        .await
        .map_err(service_error_to_http)?;
    tracing::info!(admin_id = %claims.sub, revoked, "Logout");

    Ok(Json(ApiResponse::empty("Logged out successfully")))
}

/// Profile of the administrator behind the access token
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<AdminView>>, ApiError> {
    let admin_service = AdminService::new(&pool, config.bcrypt_cost);

    match admin_service.get_by_id(claims.admin_id()).await {
        Ok(admin) => Ok(Json(ApiResponse::success(
            admin,
            "Administrator retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
