//! JWT token utilities for authentication and authorization.
//!
//! Access tokens are HS256-signed and self-verifying: signature and expiry
//! are all an authorization check needs. Refresh tokens are not JWTs; they
//! are opaque strings whose validity lives in the `sessions` table.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::AdminView;
use crate::errors::ServiceError;

/// Length of an opaque refresh token. 64 alphanumeric characters carry
/// roughly 380 bits of entropy.
pub const REFRESH_TOKEN_LENGTH: usize = 64;

/// JWT Claims carried by every access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Administrator ID
    pub sub: String,
    pub username: String,
    pub role: String,
    pub email: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating and validating tokens
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from a shared secret
    pub fn new(secret: &str, expires_in_seconds: u64) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.access_token_expires_in_seconds)
    }

    /// Lifetime of an access token in seconds
    pub fn expires_in(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Generate an access token for an administrator
    pub fn generate_access_token(&self, admin: &AdminView) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: admin.id.clone(),
            username: admin.username.clone(),
            role: admin.role.clone(),
            email: admin.email.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, ServiceError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode an access token
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::authentication(format!("Token validation failed: {}", e)))
    }

    /// Decode an access token checking only its signature.
    ///
    /// Used by the refresh flow, where the access token is expected to have
    /// run out already.
    pub fn decode_ignoring_expiry(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = self.validation.clone();
        validation.validate_exp = false;
        validation.required_spec_claims.remove("exp");

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::authentication(format!("Token validation failed: {}", e)))
    }

    /// Generate an opaque refresh token from `[A-Za-z0-9]` using the
    /// thread-local CSPRNG
    pub fn generate_refresh_token(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFRESH_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}

impl Claims {
    pub fn admin_id(&self) -> &str {
        &self.sub
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now >= self.exp
    }
}
