//! Session and token lifecycle.
//!
//! A session moves through four states:
//!
//! - **Active**: `is_active` and `expires_at` in the future. Entered once, at login.
//! - **Revoked**: `is_active` cleared by [`SessionService::revoke`] or
//!   [`SessionService::revoke_all`].
//! - **Expired**: `expires_at` has passed. Not stored; computed at read time.
//! - **Purged**: the row was deleted by [`SessionService::cleanup_expired`].
//!
//! Revoked and Expired sessions are never usable again. Refresh tokens are
//! opaque; this service is the only place that can say whether one is good.

use crate::api::common::PaginationFilter;
use crate::config::Config;
use crate::database::models::{AdminView, CreateSession, Session, SessionView};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::session_repository::SessionRepository;
use crate::utils::jwt::JwtUtils;
use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Access/refresh token pair handed out at login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// Outcome of looking up a refresh token.
#[derive(Debug, Clone)]
pub enum SessionLookup {
    Active(Session),
    Revoked,
    Expired,
    Unknown,
}

impl SessionLookup {
    /// Flattens the lookup to the usable session, if any.
    pub fn into_active(self) -> Option<Session> {
        match self {
            SessionLookup::Active(session) => Some(session),
            _ => None,
        }
    }
}

/// Client metadata recorded with a session. Best effort only.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// One page of an administrator's sessions.
#[derive(Debug)]
pub struct SessionPage {
    pub sessions: Vec<SessionView>,
    pub total: u64,
}

pub struct SessionService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
    session_ttl: Duration,
}

impl<'a> SessionService<'a> {
    pub fn new(pool: &'a SqlitePool, jwt_utils: JwtUtils, session_ttl: Duration) -> Self {
        Self {
            pool,
            jwt_utils,
            session_ttl,
        }
    }

    pub fn from_config(pool: &'a SqlitePool, config: &Config) -> Self {
        Self::new(pool, JwtUtils::from_config(config), config.session_ttl())
    }

    fn repo(&self) -> SessionRepository<'a> {
        SessionRepository::new(self.pool)
    }

    pub fn jwt(&self) -> &JwtUtils {
        &self.jwt_utils
    }

    /// Mints a signed access token and a fresh opaque refresh token.
    pub fn issue_tokens(&self, admin: &AdminView) -> ServiceResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.jwt_utils.generate_access_token(admin)?,
            refresh_token: self.jwt_utils.generate_refresh_token(),
            expires_in: self.jwt_utils.expires_in(),
        })
    }

    /// Mints a new access token only; the refresh token is not rotated.
    pub fn issue_access_token(&self, admin: &AdminView) -> ServiceResult<String> {
        self.jwt_utils.generate_access_token(admin)
    }

    /// Persists a new Active session bound to `refresh_token`.
    pub async fn create_session(
        &self,
        admin_id: &str,
        refresh_token: &str,
        client: ClientInfo,
    ) -> ServiceResult<Session> {
        let now = Utc::now();
        let session = self
            .repo()
            .create_session(CreateSession {
                id: Uuid::now_v7().to_string(),
                admin_id: admin_id.to_string(),
                refresh_token: refresh_token.to_string(),
                user_agent: client.user_agent.unwrap_or_else(|| "Unknown".to_string()),
                ip_address: client.ip_address.unwrap_or_else(|| "Unknown".to_string()),
                created_at: now,
                expires_at: now + self.session_ttl,
            })
            .await?;

        tracing::debug!(session_id = %session.id, admin_id = %admin_id, "Session created");
        Ok(session)
    }

    /// Resolves a refresh token. On `Active`, `last_used` is stamped.
    pub async fn validate(&self, refresh_token: &str) -> ServiceResult<SessionLookup> {
        let repo = self.repo();
        let Some(mut session) = repo.get_session_by_refresh_token(refresh_token).await? else {
            return Ok(SessionLookup::Unknown);
        };

        let now = Utc::now();
        if !session.is_active {
            return Ok(SessionLookup::Revoked);
        }
        if !session.is_usable_at(now) {
            return Ok(SessionLookup::Expired);
        }

        repo.touch_last_used(&session.id, now).await?;
        session.last_used = now;
        Ok(SessionLookup::Active(session))
    }

    /// The usable session for `refresh_token`, if any.
    pub async fn find_active(&self, refresh_token: &str) -> ServiceResult<Option<Session>> {
        Ok(self.validate(refresh_token).await?.into_active())
    }

    /// Sessions of one administrator, most recently used first.
    pub async fn list_for_admin(
        &self,
        admin_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<SessionPage> {
        let repo = self.repo();
        let sessions = repo
            .list_sessions_by_admin_id(admin_id, pagination.limit(), pagination.offset())
            .await?;
        let total = repo.count_sessions_by_admin_id(admin_id).await?;

        Ok(SessionPage { sessions, total })
    }

    /// Looks up a session by id without its refresh token.
    pub async fn get_by_id(&self, session_id: &str) -> ServiceResult<SessionView> {
        self.repo()
            .get_session_by_id(session_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Session", session_id))
    }

    /// Revokes one session.
    pub async fn revoke(&self, session_id: &str) -> ServiceResult<()> {
        if !self.repo().revoke_session(session_id, Utc::now()).await? {
            return Err(ServiceError::not_found("Session", session_id));
        }

        tracing::info!(session_id = %session_id, "Session revoked");
        Ok(())
    }

    /// Revokes every active session of an administrator except the one
    /// holding `except_refresh_token`.
    ///
    /// # Returns
    /// Number of sessions revoked
    pub async fn revoke_all(
        &self,
        admin_id: &str,
        except_refresh_token: Option<&str>,
    ) -> ServiceResult<u64> {
        let revoked = self
            .repo()
            .revoke_sessions_by_admin_id(admin_id, except_refresh_token, Utc::now())
            .await?;

        tracing::info!(
            admin_id = %admin_id,
            revoked,
            kept_current = except_refresh_token.is_some(),
            "Sessions revoked"
        );
        Ok(revoked)
    }

    /// Deletes every session past its expiry, active or not.
    ///
    /// # Returns
    /// Number of sessions removed
    pub async fn cleanup_expired(&self) -> ServiceResult<u64> {
        let removed = self.repo().delete_expired(Utc::now()).await?;
        if removed > 0 {
            tracing::info!(removed, "Expired sessions purged");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    const ADMIN_ID: &str = "0190f5a0-0000-7000-8000-000000000001";

    fn service(pool: &SqlitePool, ttl: Duration) -> SessionService<'_> {
        SessionService::new(pool, JwtUtils::new("test-secret", 3600), ttl)
    }

    fn admin() -> AdminView {
        let now = Utc::now();
        AdminView {
            id: ADMIN_ID.to_string(),
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: "admin".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn login(service: &SessionService<'_>, admin_id: &str) -> (String, Session) {
        let token = service.jwt().generate_refresh_token();
        let session = service
            .create_session(admin_id, &token, ClientInfo::default())
            .await
            .unwrap();
        (token, session)
    }

    #[tokio::test]
    async fn test_issue_tokens() {
        let pool = test_pool().await;
        let service = service(&pool, Duration::days(30));

        let tokens = service.issue_tokens(&admin()).unwrap();
        assert_eq!(tokens.expires_in, 3600);
        assert_ne!(tokens.access_token, tokens.refresh_token);

        let claims = service.jwt().validate_token(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, ADMIN_ID);
        assert!(service.jwt().validate_token(&tokens.refresh_token).is_err());
    }

    #[tokio::test]
    async fn test_create_and_validate_session() {
        let pool = test_pool().await;
        let service = service(&pool, Duration::days(30));

        let (token, created) = login(&service, ADMIN_ID).await;
        assert!(created.is_active);
        assert_eq!(created.user_agent, "Unknown");
        assert!(created.expires_at > created.created_at + Duration::days(29));

        let session = service.find_active(&token).await.unwrap().unwrap();
        assert_eq!(session.id, created.id);
        assert!(session.last_used >= created.last_used);

        assert!(matches!(
            service.validate("no-such-token").await.unwrap(),
            SessionLookup::Unknown
        ));
    }

    #[tokio::test]
    async fn test_validate_after_revoke_returns_nothing() {
        let pool = test_pool().await;
        let service = service(&pool, Duration::days(30));
        let (token, session) = login(&service, ADMIN_ID).await;

        service.revoke(&session.id).await.unwrap();

        assert!(matches!(
            service.validate(&token).await.unwrap(),
            SessionLookup::Revoked
        ));
        assert!(service.find_active(&token).await.unwrap().is_none());

        let view = service.get_by_id(&session.id).await.unwrap();
        assert!(!view.is_active);
        assert!(view.revoked_at.is_some());
    }

    #[tokio::test]
    async fn test_revoke_unknown_session_is_not_found() {
        let pool = test_pool().await;
        let service = service(&pool, Duration::days(30));

        assert!(matches!(
            service.revoke("missing").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_unusable() {
        let pool = test_pool().await;
        let expired = service(&pool, Duration::seconds(-1));
        let (token, _) = login(&expired, ADMIN_ID).await;

        assert!(matches!(
            expired.validate(&token).await.unwrap(),
            SessionLookup::Expired
        ));
    }

    #[tokio::test]
    async fn test_revoke_all_except_current() {
        let pool = test_pool().await;
        let service = service(&pool, Duration::days(30));
        let (current, _) = login(&service, ADMIN_ID).await;
        let (a, _) = login(&service, ADMIN_ID).await;
        let (b, _) = login(&service, ADMIN_ID).await;
        let (other_admin, _) = login(&service, "someone-else").await;

        let revoked = service.revoke_all(ADMIN_ID, Some(&current)).await.unwrap();
        assert_eq!(revoked, 2);

        assert!(service.find_active(&current).await.unwrap().is_some());
        assert!(service.find_active(&a).await.unwrap().is_none());
        assert!(service.find_active(&b).await.unwrap().is_none());
        assert!(service.find_active(&other_admin).await.unwrap().is_some());

        // Nothing left to revoke besides the current one
        let revoked = service.revoke_all(ADMIN_ID, None).await.unwrap();
        assert_eq!(revoked, 1);
        assert!(service.find_active(&current).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent() {
        let pool = test_pool().await;
        let live = service(&pool, Duration::days(30));
        let expired = service(&pool, Duration::seconds(-1));

        let (live_token, _) = login(&live, ADMIN_ID).await;
        let (_, revoked_expired) = login(&expired, ADMIN_ID).await;
        login(&expired, ADMIN_ID).await;
        expired.revoke(&revoked_expired.id).await.unwrap();

        assert_eq!(live.cleanup_expired().await.unwrap(), 2);
        assert_eq!(live.cleanup_expired().await.unwrap(), 0);

        assert!(live.find_active(&live_token).await.unwrap().is_some());
        assert!(matches!(
            live.get_by_id(&revoked_expired.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_for_admin_hides_refresh_token() {
        let pool = test_pool().await;
        let service = service(&pool, Duration::days(30));
        let (first, _) = login(&service, ADMIN_ID).await;
        login(&service, ADMIN_ID).await;
        login(&service, "someone-else").await;

        // Touch the first session so it becomes the most recently used
        let first_session = service.find_active(&first).await.unwrap().unwrap();

        let page = service
            .list_for_admin(ADMIN_ID, &PaginationFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.sessions.len(), 2);
        assert_eq!(page.sessions[0].id, first_session.id);

        let json = serde_json::to_value(&page.sessions).unwrap();
        assert!(json[0].get("refresh_token").is_none());
    }
}
