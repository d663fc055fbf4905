//! Database repository for administrator records.
//!
//! Provides CRUD operations for administrators. Uniqueness of `email` and
//! `username` is backed by unique indexes declared in the migrations.

use crate::database::models::{Admin, AdminPatch, AdminView, NewAdmin};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const ADMIN_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, role, \
                             is_active, created_at, updated_at";

const ADMIN_VIEW_COLUMNS: &str =
    "id, username, email, first_name, last_name, role, is_active, created_at, updated_at";

/// Repository for administrator database operations.
pub struct AdminRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    /// Creates a new AdminRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new administrator.
    ///
    /// # Returns
    /// The stored record without its password hash
    pub async fn create_admin(&self, admin: NewAdmin) -> Result<AdminView> {
        let query = format!(
            "INSERT INTO admins ({ADMIN_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {ADMIN_VIEW_COLUMNS}"
        );
        let admin = sqlx::query_as::<_, AdminView>(&query)
            .bind(admin.id)
            .bind(admin.username)
            .bind(admin.email)
            .bind(admin.password_hash)
            .bind(admin.first_name)
            .bind(admin.last_name)
            .bind(admin.role)
            .bind(admin.is_active)
            .bind(admin.created_at)
            .bind(admin.created_at)
            .fetch_one(self.pool)
            .await?;

        Ok(admin)
    }

    /// Retrieves an administrator by id, without the password hash.
    pub async fn get_admin_by_id(&self, id: &str) -> Result<Option<AdminView>> {
        let query = format!("SELECT {ADMIN_VIEW_COLUMNS} FROM admins WHERE id = ?");
        let admin = sqlx::query_as::<_, AdminView>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(admin)
    }

    /// Retrieves an administrator by email, including the password hash.
    ///
    /// Only used for credential verification.
    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE email = ?");
        let admin = sqlx::query_as::<_, Admin>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(admin)
    }

    /// Lists administrators newest first.
    pub async fn list_admins(&self, limit: u64, offset: u64) -> Result<Vec<AdminView>> {
        let query = format!(
            "SELECT {ADMIN_VIEW_COLUMNS} FROM admins ORDER BY created_at DESC, id DESC \
             LIMIT ? OFFSET ?"
        );
        let admins = sqlx::query_as::<_, AdminView>(&query)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.pool)
            .await?;

        Ok(admins)
    }

    /// Total number of administrators.
    pub async fn count_admins(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(self.pool)
            .await?;

        Ok(count as u64)
    }

    /// Checks if an email is already taken, optionally ignoring one record.
    pub async fn email_exists(&self, email: &str, exclude_id: Option<&str>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE email = ? AND id != ?")
                .bind(email)
                .bind(exclude_id.unwrap_or(""))
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Checks if a username is already taken, optionally ignoring one record.
    pub async fn username_exists(&self, username: &str, exclude_id: Option<&str>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE username = ? AND id != ?")
                .bind(username)
                .bind(exclude_id.unwrap_or(""))
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Applies the present fields of `patch` and stamps `updated_at`.
    ///
    /// # Returns
    /// `true` if a record matched `id`
    pub async fn update_admin(
        &self,
        id: &str,
        patch: AdminPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE admins SET updated_at = ");
        builder.push_bind(updated_at);

        if let Some(username) = patch.username {
            builder.push(", username = ").push_bind(username);
        }
        if let Some(email) = patch.email {
            builder.push(", email = ").push_bind(email);
        }
        if let Some(password_hash) = patch.password_hash {
            builder.push(", password_hash = ").push_bind(password_hash);
        }
        if let Some(first_name) = patch.first_name {
            builder.push(", first_name = ").push_bind(first_name);
        }
        if let Some(last_name) = patch.last_name {
            builder.push(", last_name = ").push_bind(last_name);
        }
        if let Some(role) = patch.role {
            builder.push(", role = ").push_bind(role);
        }
        if let Some(is_active) = patch.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes an administrator.
    ///
    /// # Returns
    /// `true` if a record was removed
    pub async fn delete_admin(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
