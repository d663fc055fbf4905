//! Database repository for session records.
//!
//! Sessions are never joined against administrators; `admin_id` is a plain
//! stored value. Deleting rows only ever happens through
//! [`SessionRepository::delete_expired`].

use crate::database::models::{CreateSession, Session, SessionView};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const SESSION_COLUMNS: &str = "id, admin_id, refresh_token, user_agent, ip_address, created_at, \
                               last_used, expires_at, is_active, revoked_at";

const SESSION_VIEW_COLUMNS: &str = "id, admin_id, user_agent, ip_address, created_at, last_used, \
                                    expires_at, is_active, revoked_at";

pub struct SessionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SessionRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new active session. `last_used` starts at `created_at`.
    pub async fn create_session(&self, session: CreateSession) -> Result<Session> {
        let query = format!(
            "INSERT INTO sessions ({SESSION_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, NULL) \
             RETURNING {SESSION_COLUMNS}"
        );
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(session.id)
            .bind(session.admin_id)
            .bind(session.refresh_token)
            .bind(session.user_agent)
            .bind(session.ip_address)
            .bind(session.created_at)
            .bind(session.created_at)
            .bind(session.expires_at)
            .fetch_one(self.pool)
            .await?;

        Ok(session)
    }

    /// Looks up a session by refresh token regardless of its state.
    pub async fn get_session_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE refresh_token = ?");
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(refresh_token)
            .fetch_optional(self.pool)
            .await?;

        Ok(session)
    }

    pub async fn get_session_by_id(&self, id: &str) -> Result<Option<SessionView>> {
        let query = format!("SELECT {SESSION_VIEW_COLUMNS} FROM sessions WHERE id = ?");
        let session = sqlx::query_as::<_, SessionView>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(session)
    }

    /// Stamps `last_used` on a session.
    pub async fn touch_last_used(&self, id: &str, now: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE sessions SET last_used = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Sessions of one administrator, most recently used first.
    pub async fn list_sessions_by_admin_id(
        &self,
        admin_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<SessionView>> {
        let query = format!(
            "SELECT {SESSION_VIEW_COLUMNS} FROM sessions WHERE admin_id = ? \
             ORDER BY last_used DESC, id DESC LIMIT ? OFFSET ?"
        );
        let sessions = sqlx::query_as::<_, SessionView>(&query)
            .bind(admin_id)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.pool)
            .await?;

        Ok(sessions)
    }

    pub async fn count_sessions_by_admin_id(&self, admin_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE admin_id = ?")
            .bind(admin_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count as u64)
    }

    /// Deactivates one session. A session revoked twice keeps its first
    /// `revoked_at`.
    ///
    /// # Returns
    /// `true` if a session matched `id`
    pub async fn revoke_session(&self, id: &str, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET is_active = 0, revoked_at = COALESCE(revoked_at, ?) WHERE id = ?",
        )
        .bind(now)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deactivates every active session of an administrator, optionally
    /// sparing the one holding `except_refresh_token`.
    ///
    /// # Returns
    /// Number of sessions revoked
    pub async fn revoke_sessions_by_admin_id(
        &self,
        admin_id: &str,
        except_refresh_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let result = match except_refresh_token {
            Some(token) => {
                sqlx::query(
                    "UPDATE sessions SET is_active = 0, revoked_at = ? \
                     WHERE admin_id = ? AND is_active = 1 AND refresh_token != ?",
                )
                .bind(now)
                .bind(admin_id)
                .bind(token)
                .execute(self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE sessions SET is_active = 0, revoked_at = ? \
                     WHERE admin_id = ? AND is_active = 1",
                )
                .bind(now)
                .bind(admin_id)
                .execute(self.pool)
                .await?
            }
        };

        Ok(result.rows_affected())
    }

    /// Physically removes every session whose `expires_at` is not after `now`.
    ///
    /// # Returns
    /// Number of rows deleted
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
