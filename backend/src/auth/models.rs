//! Request and response payloads for the authentication endpoints.

use crate::database::models::AdminView;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[serde(default)]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[serde(default)]
    pub password: String,
}

/// Login response containing tokens and the authenticated administrator
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub admin: AdminView,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    #[serde(default)]
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Logout request; the refresh token is optional
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}
