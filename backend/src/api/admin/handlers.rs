//! Handler functions for administrator management endpoints.
//!
//! Every handler runs behind `jwt_auth`; the caller's claims are used to
//! stop an administrator from deleting their own account.

use crate::api::common::{
    ApiError, ApiResponse, JsonBody, PaginatedData, PaginationFilter, PaginationMeta,
    pagination_from_query, service_error_to_http,
};
use crate::config::Config;
use crate::database::models::{AdminView, CreateAdmin, UpdateAdmin};
use crate::errors::ServiceError;
use crate::services::admin_service::AdminService;
use crate::services::session_service::SessionService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Path, Query, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Creates a new administrator.
pub async fn create_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Extension(claims): Extension<Claims>,
    JsonBody(payload): JsonBody<CreateAdmin>,
) -> Result<(StatusCode, Json<ApiResponse<AdminView>>), ApiError> {
    let service = AdminService::new(&pool, config.bcrypt_cost);

    tracing::info!(created_by = %claims.sub, "Creating administrator");

    match service.create(payload).await {
        Ok(admin) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(admin, "Administrator created successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists administrators, newest first.
pub async fn list_admins(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    query: Result<Query<PaginationFilter>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginatedData<AdminView>>>, ApiError> {
    let filter = pagination_from_query(query)?;
    let service = AdminService::new(&pool, config.bcrypt_cost);

    let page = service.list(&filter).await.map_err(service_error_to_http)?;
    let pagination = PaginationMeta::from_filter(&filter, page.total);

    Ok(Json(ApiResponse::paginated(
        PaginatedData::new(page.admins, page.total),
        pagination,
        "Administrators retrieved successfully",
    )))
}

pub async fn get_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AdminView>>, ApiError> {
    let service = AdminService::new(&pool, config.bcrypt_cost);

    match service.get_by_id(&id).await {
        Ok(admin) => Ok(Json(ApiResponse::success(
            admin,
            "Administrator retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Applies a partial update. A password change signs the administrator out
/// everywhere.
pub async fn update_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateAdmin>,
) -> Result<Json<ApiResponse<AdminView>>, ApiError> {
    let service = AdminService::new(&pool, config.bcrypt_cost);
    let password_changed = payload.password.is_some();

    let admin = service
        .update(&id, payload)
        .await
        .map_err(service_error_to_http)?;

    if password_changed {
        SessionService::from_config(&pool, &config)
            .revoke_all(&admin.id, None)
            .await
            .map_err(service_error_to_http)?;
    }

    Ok(Json(ApiResponse::success(
        admin,
        "Administrator updated successfully",
    )))
}

/// Deletes an administrator and revokes their sessions.
pub async fn delete_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if claims.admin_id() == id {
        return Err(service_error_to_http(ServiceError::invalid_operation(
            "You cannot delete your own account",
        )));
    }

    let service = AdminService::new(&pool, config.bcrypt_cost);
    service.delete(&id).await.map_err(service_error_to_http)?;

    SessionService::from_config(&pool, &config)
        .revoke_all(&id, None)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::empty("Administrator deleted successfully")))
}
