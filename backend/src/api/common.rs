//! Response envelope and error conversion for API handlers.
//!
//! Provides structured responses and conversion between service-layer errors
//! and HTTP responses. Includes:
//! - Standard response envelope
//! - ServiceError to HTTP status code mapping
//! - Pagination support for list endpoints
//!
//! # Response Format
//! Every response, successful or not, is a JSON object containing:
//! - `success`: Whether the request succeeded
//! - `message`: Human-readable message
//! - `data`: Payload, `null` on failure
//! - `error`: Machine-readable error category (failures only)
//! - `pagination`: Page metadata (paginated lists only)
//!
//! # Error Handling Flow
//! 1. Service layer returns domain-specific `ServiceError`
//! 2. `service_error_to_http` converts to appropriate HTTP response
//! 3. Storage errors are logged and replaced with a generic message

use crate::errors::{ServiceError, validation_message};
use axum::{
    body::Bytes,
    extract::{
        FromRequest, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use validator::Validate;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Response data (`null` on failure)
    pub data: Option<T>,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Pagination metadata (present for paginated responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    /// Request timestamp
    pub timestamp: String,
}

/// Pagination metadata for list responses
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub limit: u32,
    /// Total number of items across all pages
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Paginated response wrapper containing items and their total count
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedData<T> {
    /// List of items for current page
    pub items: Vec<T>,
    /// Total count of items across all pages
    pub total: u64,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
}

/// Pagination parameters for requests
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PaginationFilter {
    /// Page number (1-indexed)
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,
    /// Number of items per page
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

// ============================================================================
// Implementation Details
// ============================================================================

impl PaginationMeta {
    /// Create pagination metadata from page parameters and total count
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            ((total - 1) / limit as u64 + 1) as u32
        };

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    pub fn from_filter(filter: &PaginationFilter, total: u64) -> Self {
        Self::new(filter.page(), filter.limit_or_default(), total)
    }
}

impl<T> PaginatedData<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            pagination: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful paginated response
    pub fn paginated(data: T, pagination: PaginationMeta, message: impl Into<String>) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(data, message)
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response without a payload
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
            pagination: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(ErrorDetails {
                error_type: error_type.into(),
            }),
            pagination: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl PaginationFilter {
    /// Get page number with default
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Get limit with default
    pub fn limit_or_default(&self) -> u32 {
        self.limit.unwrap_or(10)
    }

    /// Calculate offset for database queries
    pub fn offset(&self) -> u64 {
        (self.page().saturating_sub(1) as u64) * self.limit_or_default() as u64
    }

    /// Get limit for database queries
    pub fn limit(&self) -> u64 {
        self.limit_or_default() as u64
    }

    /// Rejects out-of-range page parameters
    pub fn validated(self) -> Result<Self, ApiError> {
        match self.validate() {
            Ok(()) => Ok(self),
            Err(errors) => Err(service_error_to_http(ServiceError::validation(
                validation_message(&errors),
            ))),
        }
    }
}

impl Default for PaginationFilter {
    fn default() -> Self {
        Self {
            page: Some(1),
            limit: Some(10),
        }
    }
}

/// JSON body extractor whose rejections use the standard error envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(service_error_to_http(ServiceError::validation(
                rejection.body_text(),
            ))),
        }
    }
}

/// JSON body extractor for endpoints where the body may be omitted.
///
/// An empty body yields `T::default()`. Content type is not enforced.
pub struct OptionalJsonBody<T>(pub T);

impl<S, T> FromRequest<S> for OptionalJsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state).await.map_err(|rejection| {
            service_error_to_http(ServiceError::validation(rejection.body_text()))
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(OptionalJsonBody)
            .map_err(|error| {
                service_error_to_http(ServiceError::validation(format!(
                    "Invalid JSON body: {}",
                    error
                )))
            })
    }
}

/// Unwraps `?page&limit` query parameters, reporting malformed or
/// out-of-range values with the standard error envelope.
pub fn pagination_from_query(
    query: Result<Query<PaginationFilter>, QueryRejection>,
) -> Result<PaginationFilter, ApiError> {
    match query {
        Ok(Query(filter)) => filter.validated(),
        Err(rejection) => Err(service_error_to_http(ServiceError::validation(
            rejection.body_text(),
        ))),
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    let (status, error_type, message) = match error {
        ServiceError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ServiceError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} not found", entity),
        ),
        ServiceError::AlreadyExists { entity, .. } => (
            StatusCode::CONFLICT,
            "already_exists",
            format!("{} already exists", entity),
        ),
        ServiceError::Authentication { message } => {
            (StatusCode::UNAUTHORIZED, "authentication_error", message)
        }
        ServiceError::InvalidOperation { message } => {
            (StatusCode::BAD_REQUEST, "invalid_operation", message)
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {:#}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };

    (status, Json(ApiResponse::error(message, error_type)))
}
