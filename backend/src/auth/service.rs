//! Core business logic for the authentication flows.
//!
//! Login, refresh and logout are composed here from the account and session
//! services. This is the only place where the internal failure categories
//! (`CredentialCheck`, `SessionLookup`) are flattened into the deliberately
//! vague errors the outside world sees.

use crate::auth::models::*;
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult, validation_message};
use crate::services::admin_service::{AdminService, CredentialCheck};
use crate::services::session_service::{ClientInfo, SessionLookup, SessionService};
use sqlx::SqlitePool;
use validator::Validate;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ACCOUNT_DISABLED: &str = "Account is disabled";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";
pub const ADMIN_UNAVAILABLE: &str = "Administrator not found or disabled";

/// Authentication service for handling login, token refresh and logout
pub struct AuthService<'a> {
    admin_service: AdminService<'a>,
    session_service: SessionService<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        Self::from_parts(
            AdminService::new(pool, config.bcrypt_cost),
            SessionService::from_config(pool, config),
        )
    }

    pub fn from_parts(admin_service: AdminService<'a>, session_service: SessionService<'a>) -> Self {
        Self {
            admin_service,
            session_service,
        }
    }

    /// Authenticate an administrator and open a new session
    pub async fn login(
        &self,
        login_request: LoginRequest,
        client: ClientInfo,
    ) -> ServiceResult<LoginResponse> {
        if let Err(validation_errors) = login_request.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let admin = match self
            .admin_service
            .verify_credentials(&login_request.email, &login_request.password)
            .await?
        {
            CredentialCheck::Verified(admin) => admin,
            CredentialCheck::UnknownAccount => {
                tracing::info!("Login rejected: unknown account");
                return Err(ServiceError::authentication(INVALID_CREDENTIALS));
            }
            CredentialCheck::WrongPassword => {
                tracing::info!("Login rejected: wrong password");
                return Err(ServiceError::authentication(INVALID_CREDENTIALS));
            }
        };

        if !admin.is_active {
            tracing::info!(admin_id = %admin.id, "Login rejected: account disabled");
            return Err(ServiceError::authentication(ACCOUNT_DISABLED));
        }

        let tokens = self.session_service.issue_tokens(&admin)?;
        let session = self
            .session_service
            .create_session(&admin.id, &tokens.refresh_token, client)
            .await?;

        tracing::info!(admin_id = %admin.id, session_id = %session.id, "Login succeeded");

        Ok(LoginResponse {
            admin,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        })
    }

    /// Mint a new access token from a live session.
    ///
    /// `access_token` is the previously issued access token. Its signature
    /// must check out but its expiry is ignored, and its subject must match
    /// the administrator the session belongs to. The administrator itself is
    /// taken from the session row. The refresh token is not rotated.
    pub async fn refresh_token(
        &self,
        access_token: &str,
        request: RefreshTokenRequest,
    ) -> ServiceResult<RefreshTokenResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let claims = self
            .session_service
            .jwt()
            .decode_ignoring_expiry(access_token)
            .map_err(|_| ServiceError::authentication(INVALID_REFRESH_TOKEN))?;

        let session = match self.session_service.validate(&request.refresh_token).await? {
            SessionLookup::Active(session) => session,
            lookup => {
                tracing::info!(outcome = lookup_kind(&lookup), "Refresh rejected");
                return Err(ServiceError::authentication(INVALID_REFRESH_TOKEN));
            }
        };

        if claims.admin_id() != session.admin_id {
            tracing::warn!(
                session_id = %session.id,
                "Refresh rejected: access token subject does not own the session"
            );
            return Err(ServiceError::authentication(INVALID_REFRESH_TOKEN));
        }

        let admin = match self.admin_service.get_by_id(&session.admin_id).await {
            Ok(admin) if admin.is_active => admin,
            Ok(_) | Err(ServiceError::NotFound { .. }) => {
                return Err(ServiceError::authentication(ADMIN_UNAVAILABLE));
            }
            Err(error) => return Err(error),
        };

        let access_token = self.session_service.issue_access_token(&admin)?;
        tracing::debug!(admin_id = %admin.id, session_id = %session.id, "Access token refreshed");

        Ok(RefreshTokenResponse {
            access_token,
            expires_in: self.session_service.jwt().expires_in(),
        })
    }

    /// Revoke the session behind `refresh_token`, if it is still live.
    ///
    /// Always succeeds for business outcomes; returns whether a session was
    /// revoked.
    pub async fn logout(&self, request: LogoutRequest) -> ServiceResult<bool> {
        let Some(refresh_token) = request.refresh_token.filter(|t| !t.is_empty()) else {
            return Ok(false);
        };

        match self.session_service.find_active(&refresh_token).await? {
            Some(session) => {
                self.session_service.revoke(&session.id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn lookup_kind(lookup: &SessionLookup) -> &'static str {
    match lookup {
        SessionLookup::Active(_) => "active",
        SessionLookup::Revoked => "revoked",
        SessionLookup::Expired => "expired",
        SessionLookup::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreateAdmin, UpdateAdmin};
    use crate::database::test_pool;
    use crate::utils::jwt::{Claims, JwtUtils};
    use chrono::{Duration, Utc};

    const TEST_COST: u32 = 4;

    fn auth(pool: &SqlitePool) -> AuthService<'_> {
        AuthService::from_parts(
            AdminService::new(pool, TEST_COST),
            SessionService::new(pool, JwtUtils::new("test-secret", 3600), Duration::days(30)),
        )
    }

    async fn seed_admin(pool: &SqlitePool, email: &str) -> String {
        AdminService::new(pool, TEST_COST)
            .create(CreateAdmin {
                username: email.split('@').next().unwrap().to_string(),
                email: email.to_string(),
                password: "Test1234".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: "admin".to_string(),
                is_active: true,
            })
            .await
            .unwrap()
            .id
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_tokens_and_session() {
        let pool = test_pool().await;
        let admin_id = seed_admin(&pool, "ada@example.com").await;
        let auth = auth(&pool);

        let response = auth
            .login(
                login_request("ada@example.com", "Test1234"),
                ClientInfo {
                    user_agent: Some("test-agent".to_string()),
                    ip_address: Some("127.0.0.1".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(response.admin.id, admin_id);
        assert_eq!(response.expires_in, 3600);

        let session = auth
            .session_service
            .find_active(&response.refresh_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.admin_id, admin_id);
        assert_eq!(session.user_agent, "test-agent");
        assert_eq!(session.ip_address, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let pool = test_pool().await;
        seed_admin(&pool, "ada@example.com").await;
        let auth = auth(&pool);

        let wrong_password = auth
            .login(login_request("ada@example.com", "Nope1234"), ClientInfo::default())
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(login_request("ghost@example.com", "Test1234"), ClientInfo::default())
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ServiceError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_login_rejects_disabled_account() {
        let pool = test_pool().await;
        let admin_id = seed_admin(&pool, "ada@example.com").await;
        AdminService::new(&pool, TEST_COST)
            .update(
                &admin_id,
                UpdateAdmin {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let error = auth(&pool)
            .login(login_request("ada@example.com", "Test1234"), ClientInfo::default())
            .await
            .unwrap_err();

        match error {
            ServiceError::Authentication { message } => assert_eq!(message, ACCOUNT_DISABLED),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let pool = test_pool().await;
        let error = auth(&pool)
            .login(login_request("", ""), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_refresh_accepts_expired_access_token_without_rotation() {
        let pool = test_pool().await;
        let admin_id = seed_admin(&pool, "ada@example.com").await;
        let auth = auth(&pool);
        let login = auth
            .login(login_request("ada@example.com", "Test1234"), ClientInfo::default())
            .await
            .unwrap();

        let now = Utc::now().timestamp() as usize;
        let expired_access = auth
            .session_service
            .jwt()
            .encode_claims(&Claims {
                sub: admin_id.clone(),
                username: "ada".to_string(),
                role: "admin".to_string(),
                email: "ada@example.com".to_string(),
                exp: now - 60,
                iat: now - 3660,
            })
            .unwrap();

        for _ in 0..2 {
            let refreshed = auth
                .refresh_token(
                    &expired_access,
                    RefreshTokenRequest {
                        refresh_token: login.refresh_token.clone(),
                    },
                )
                .await
                .unwrap();
            let claims = auth
                .session_service
                .jwt()
                .validate_token(&refreshed.access_token)
                .unwrap();
            assert_eq!(claims.sub, admin_id);
        }
    }

    #[tokio::test]
    async fn test_refresh_rejects_foreign_access_token() {
        let pool = test_pool().await;
        seed_admin(&pool, "ada@example.com").await;
        seed_admin(&pool, "bob@example.com").await;
        let auth = auth(&pool);

        let ada = auth
            .login(login_request("ada@example.com", "Test1234"), ClientInfo::default())
            .await
            .unwrap();
        let bob = auth
            .login(login_request("bob@example.com", "Test1234"), ClientInfo::default())
            .await
            .unwrap();

        let error = auth
            .refresh_token(
                &bob.access_token,
                RefreshTokenRequest {
                    refresh_token: ada.refresh_token,
                },
            )
            .await
            .unwrap_err();
        match error {
            ServiceError::Authentication { message } => {
                assert_eq!(message, INVALID_REFRESH_TOKEN)
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let error = auth
            .refresh_token(
                "not-a-jwt",
                RefreshTokenRequest {
                    refresh_token: bob.refresh_token,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_refresh_rejects_disabled_admin() {
        let pool = test_pool().await;
        let admin_id = seed_admin(&pool, "ada@example.com").await;
        let auth = auth(&pool);
        let login = auth
            .login(login_request("ada@example.com", "Test1234"), ClientInfo::default())
            .await
            .unwrap();

        AdminService::new(&pool, TEST_COST)
            .update(
                &admin_id,
                UpdateAdmin {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let error = auth
            .refresh_token(
                &login.access_token,
                RefreshTokenRequest {
                    refresh_token: login.refresh_token,
                },
            )
            .await
            .unwrap_err();
        match error {
            ServiceError::Authentication { message } => assert_eq!(message, ADMIN_UNAVAILABLE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_logout_revokes_and_is_always_successful() {
        let pool = test_pool().await;
        seed_admin(&pool, "ada@example.com").await;
        let auth = auth(&pool);
        let login = auth
            .login(login_request("ada@example.com", "Test1234"), ClientInfo::default())
            .await
            .unwrap();

        assert!(!auth.logout(LogoutRequest::default()).await.unwrap());
        assert!(
            !auth
                .logout(LogoutRequest {
                    refresh_token: Some("unknown".to_string()),
                })
                .await
                .unwrap()
        );

        let revoked = auth
            .logout(LogoutRequest {
                refresh_token: Some(login.refresh_token.clone()),
            })
            .await
            .unwrap();
        assert!(revoked);

        let error = auth
            .refresh_token(
                &login.access_token,
                RefreshTokenRequest {
                    refresh_token: login.refresh_token.clone(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::Authentication { .. }));

        // A second logout with the same token is a quiet no-op
        assert!(
            !auth
                .logout(LogoutRequest {
                    refresh_token: Some(login.refresh_token),
                })
                .await
                .unwrap()
        );
    }
}
