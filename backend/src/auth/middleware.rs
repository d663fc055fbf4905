//! Middleware for protecting authenticated routes.
//!
//! This module validates bearer access tokens and exposes request metadata
//! (user agent, client address) recorded on new sessions.

use crate::api::common::{ApiError, service_error_to_http};
use crate::config::Config;
use crate::errors::ServiceError;
use crate::services::session_service::ClientInfo;
use crate::utils::jwt::JwtUtils;
use axum::{
    extract::{ConnectInfo, FromRequestParts, Request},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, USER_AGENT},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware.
///
/// On success the decoded `Claims` are inserted into the request extensions.
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let config = request
        .extensions()
        .get::<Arc<Config>>()
        .cloned()
        .ok_or_else(|| {
            service_error_to_http(ServiceError::internal_error(
                "Configuration extension missing",
            ))
        })?;

    let token = bearer_token(request.headers()).ok_or_else(|| {
        service_error_to_http(ServiceError::authentication(
            "Missing or malformed Authorization header",
        ))
    })?;

    let claims = JwtUtils::from_config(&config)
        .validate_token(token)
        .map_err(service_error_to_http)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Best-effort client metadata: the first `X-Forwarded-For` hop, falling
/// back to the peer address when the server was started with connect info.
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let forwarded = parts
            .headers
            .get(X_FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let ip_address = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(ClientInfo {
            user_agent,
            ip_address,
        })
    }
}
