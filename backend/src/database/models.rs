//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. The `*View` types are what leaves the service: they
//! carry neither password hashes nor refresh tokens.

use crate::utils::validation::{validate_email_format, validate_password_strength};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full administrator row, including the password hash.
///
/// Never serialized; handlers only ever see [`AdminView`].
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrator as returned by every read operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct AdminView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminView {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            first_name: admin.first_name,
            last_name: admin.last_name,
            role: admin.role,
            is_active: admin.is_active,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

fn default_role() -> String {
    "admin".to_string()
}

fn default_active() -> bool {
    true
}

/// Signup payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdmin {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: String,

    #[validate(
        custom(function = "validate_email_format"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default = "default_role")]
    #[validate(length(min = 1, max = 64, message = "Role must be between 1-64 characters"))]
    pub role: String,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Partial update. Each field is applied only when present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAdmin {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: Option<String>,

    #[validate(
        custom(function = "validate_email_format"),
        length(max = 255, message = "Email too long")
    )]
    pub email: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Role must be between 1-64 characters"))]
    pub role: Option<String>,

    pub is_active: Option<bool>,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
}

impl UpdateAdmin {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
            && self.password.is_none()
    }
}

/// Insert DTO for the admin repository. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Column patch for the admin repository.
#[derive(Debug, Clone, Default)]
pub struct AdminPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Full session row, including the refresh token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub admin_id: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session is usable only while it is active and not yet expired.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }
}

/// Session as listed to its owner; the refresh token is never included.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionView {
    pub id: String,
    pub admin_id: String,
    pub user_agent: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Insert DTO for the session repository.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: String,
    pub admin_id: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
