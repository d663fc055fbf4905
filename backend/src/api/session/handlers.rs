//! Handler functions for session management endpoints.
//!
//! Listing and bulk revocation act on the sessions of the authenticated
//! administrator only.

use super::models::{CleanupResponse, RevokeAllRequest, RevokeAllResponse};
use crate::api::common::{
    ApiError, ApiResponse, OptionalJsonBody, PaginatedData, PaginationFilter, PaginationMeta,
    pagination_from_query, service_error_to_http,
};
use crate::config::Config;
use crate::database::models::SessionView;
use crate::errors::ServiceError;
use crate::services::session_service::SessionService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Path, Query, rejection::QueryRejection},
    response::Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Lists the caller's sessions, most recently used first.
pub async fn list_sessions(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<PaginationFilter>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginatedData<SessionView>>>, ApiError> {
    let filter = pagination_from_query(query)?;
    let service = SessionService::from_config(&pool, &config);

    let page = service
        .list_for_admin(claims.admin_id(), &filter)
        .await
        .map_err(service_error_to_http)?;
    let pagination = PaginationMeta::from_filter(&filter, page.total);

    Ok(Json(ApiResponse::paginated(
        PaginatedData::new(page.sessions, page.total),
        pagination,
        "Sessions retrieved successfully",
    )))
}

/// Revokes one of the caller's sessions.
///
/// Sessions owned by another administrator are reported as not found.
pub async fn revoke_session(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let service = SessionService::from_config(&pool, &config);

    let session = service
        .get_by_id(&session_id)
        .await
        .map_err(service_error_to_http)?;
    if session.admin_id != claims.admin_id() {
        return Err(service_error_to_http(ServiceError::not_found(
            "Session",
            &session_id,
        )));
    }

    service
        .revoke(&session_id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::empty("Session revoked successfully")))
}

/// Revokes all of the caller's sessions, optionally sparing one.
pub async fn revoke_all_sessions(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Extension(claims): Extension<Claims>,
    OptionalJsonBody(payload): OptionalJsonBody<RevokeAllRequest>,
) -> Result<Json<ApiResponse<RevokeAllResponse>>, ApiError> {
    let service = SessionService::from_config(&pool, &config);
    let except_token = payload.except_token.filter(|token| !token.is_empty());

    let revoked_count = service
        .revoke_all(claims.admin_id(), except_token.as_deref())
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        RevokeAllResponse { revoked_count },
        format!("Revoked {} sessions", revoked_count),
    )))
}

/// Purges expired sessions on demand.
pub async fn cleanup_sessions(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
) -> Result<Json<ApiResponse<CleanupResponse>>, ApiError> {
    let service = SessionService::from_config(&pool, &config);

    let deleted_count = service
        .cleanup_expired()
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        CleanupResponse { deleted_count },
        format!("Cleaned up {} expired sessions", deleted_count),
    )))
}
