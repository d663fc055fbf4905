//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token lifetimes and the optional bootstrap
//! administrator used to seed an empty database.

use anyhow::{Context, Result};
use std::env;

/// One year.
const MAX_ACCESS_TOKEN_SECONDS: u64 = 365 * 24 * 60 * 60;
/// Ten years.
const MAX_REFRESH_TOKEN_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub access_token_expires_in_seconds: u64,
    pub refresh_token_expires_in_days: i64,
    pub bcrypt_cost: u32,
    pub session_cleanup_interval_seconds: u64,
    pub server_port: u16,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the first administrator, created only when the
/// `admins` table is empty.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let access_token_expires_in_seconds = env::var("ACCESS_TOKEN_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .context("ACCESS_TOKEN_EXPIRES_IN_SECONDS must be a valid number")?;

        let refresh_token_expires_in_days = env::var("REFRESH_TOKEN_EXPIRES_IN_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()
            .context("REFRESH_TOKEN_EXPIRES_IN_DAYS must be a valid number")?;

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
            .parse::<u32>()
            .context("BCRYPT_COST must be a valid number")?;

        let session_cleanup_interval_seconds = env::var("SESSION_CLEANUP_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .context("SESSION_CLEANUP_INTERVAL_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_EMAIL"),
            env::var("BOOTSTRAP_ADMIN_USERNAME"),
            env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(username), Ok(password)) => Some(BootstrapAdmin {
                email,
                username,
                password,
            }),
            _ => None,
        };

        let config = Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            access_token_expires_in_seconds,
            refresh_token_expires_in_days,
            bcrypt_cost,
            session_cleanup_interval_seconds,
            server_port,
            bootstrap_admin,
        };
        config.validate()?;

        Ok(config)
    }

    /// Rejects token lifetimes and costs outside what the services can
    /// represent without overflowing timestamp arithmetic.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (1..=MAX_ACCESS_TOKEN_SECONDS).contains(&self.access_token_expires_in_seconds),
            "ACCESS_TOKEN_EXPIRES_IN_SECONDS must be between 1 and {}",
            MAX_ACCESS_TOKEN_SECONDS
        );
        anyhow::ensure!(
            (1..=MAX_REFRESH_TOKEN_DAYS).contains(&self.refresh_token_expires_in_days),
            "REFRESH_TOKEN_EXPIRES_IN_DAYS must be between 1 and {}",
            MAX_REFRESH_TOKEN_DAYS
        );
        anyhow::ensure!(
            (4..=31).contains(&self.bcrypt_cost),
            "BCRYPT_COST must be between 4 and 31"
        );
        Ok(())
    }

    /// Lifetime of a session row and its refresh token.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_expires_in_days)
    }
}
