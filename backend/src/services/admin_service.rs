//! Administrator account business logic.
//!
//! Owns administrator records: validated creation, uniqueness enforcement,
//! password hashing and credential verification. Knows nothing of sessions.

use crate::api::common::PaginationFilter;
use crate::config::BootstrapAdmin;
use crate::database::models::{Admin, AdminPatch, AdminView, CreateAdmin, NewAdmin, UpdateAdmin};
use crate::errors::{ServiceError, ServiceResult, validation_message};
use crate::repositories::admin_repository::AdminRepository;
use crate::utils::password::{hash_password, verify_against_dummy, verify_password};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Entity name for every administrator error, whichever check raised it.
const ADMIN_ENTITY: &str = "Administrator";

/// Outcome of a credential check.
///
/// Callers facing the outside world must treat `UnknownAccount` and
/// `WrongPassword` identically.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialCheck {
    Verified(AdminView),
    UnknownAccount,
    WrongPassword,
}

/// One page of administrators.
#[derive(Debug)]
pub struct AdminPage {
    pub admins: Vec<AdminView>,
    pub total: u64,
}

/// Service layer for administrator operations.
pub struct AdminService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    /// bcrypt cost used for new hashes
    password_cost: u32,
}

impl<'a> AdminService<'a> {
    /// Creates a new AdminService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `password_cost` - bcrypt cost factor for new password hashes
    pub fn new(pool: &'a SqlitePool, password_cost: u32) -> Self {
        Self {
            pool,
            password_cost,
        }
    }

    fn repo(&self) -> AdminRepository<'a> {
        AdminRepository::new(self.pool)
    }

    /// Creates a new administrator with full validation.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Malformed email or weak password (`Validation`)
    /// - Email or username already registered (`AlreadyExists`)
    pub async fn create(&self, input: CreateAdmin) -> ServiceResult<AdminView> {
        if let Err(validation_errors) = input.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let repo = self.repo();

        if repo.email_exists(&input.email, None).await? {
            return Err(ServiceError::already_exists(ADMIN_ENTITY, &input.email));
        }
        if repo.username_exists(&input.username, None).await? {
            return Err(ServiceError::already_exists(ADMIN_ENTITY, &input.username));
        }

        let password_hash = hash_password(&input.password, self.password_cost)?;
        let email = input.email.clone();

        let admin = repo
            .create_admin(NewAdmin {
                id: Uuid::now_v7().to_string(),
                username: input.username,
                email: input.email,
                password_hash,
                first_name: input.first_name,
                last_name: input.last_name,
                role: input.role,
                is_active: input.is_active,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| ServiceError::from_write(e, ADMIN_ENTITY, &email))?;

        tracing::info!(admin_id = %admin.id, username = %admin.username, "Administrator created");
        Ok(admin)
    }

    /// Retrieves an administrator by ID.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the administrator doesn't exist
    pub async fn get_by_id(&self, id: &str) -> ServiceResult<AdminView> {
        self.repo()
            .get_admin_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ADMIN_ENTITY, id))
    }

    /// Lists administrators newest first.
    pub async fn list(&self, pagination: &PaginationFilter) -> ServiceResult<AdminPage> {
        let repo = self.repo();
        let admins = repo
            .list_admins(pagination.limit(), pagination.offset())
            .await?;
        let total = repo.count_admins().await?;

        Ok(AdminPage { admins, total })
    }

    /// Applies a partial update.
    ///
    /// Email and password are re-validated when present; a new password is
    /// re-hashed before it reaches the repository.
    pub async fn update(&self, id: &str, update: UpdateAdmin) -> ServiceResult<AdminView> {
        if update.is_empty() {
            return Err(ServiceError::validation("No fields provided to update"));
        }
        if let Err(validation_errors) = update.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let repo = self.repo();

        if let Some(email) = &update.email {
            if repo.email_exists(email, Some(id)).await? {
                return Err(ServiceError::already_exists(ADMIN_ENTITY, email));
            }
        }
        if let Some(username) = &update.username {
            if repo.username_exists(username, Some(id)).await? {
                return Err(ServiceError::already_exists(ADMIN_ENTITY, username));
            }
        }

        let password_hash = match &update.password {
            Some(password) => Some(hash_password(password, self.password_cost)?),
            None => None,
        };

        let patch = AdminPatch {
            username: update.username,
            email: update.email,
            password_hash,
            first_name: update.first_name,
            last_name: update.last_name,
            role: update.role,
            is_active: update.is_active,
        };

        let matched = repo
            .update_admin(id, patch, Utc::now())
            .await
            .map_err(|e| ServiceError::from_write(e, ADMIN_ENTITY, id))?;
        if !matched {
            return Err(ServiceError::not_found(ADMIN_ENTITY, id));
        }

        tracing::info!(admin_id = %id, "Administrator updated");
        self.get_by_id(id).await
    }

    /// Removes an administrator.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.repo().delete_admin(id).await? {
            return Err(ServiceError::not_found(ADMIN_ENTITY, id));
        }

        tracing::info!(admin_id = %id, "Administrator deleted");
        Ok(())
    }

    /// Retrieves the full record, password hash included.
    ///
    /// Exists only for credential verification and is never handed to a
    /// handler.
    pub(crate) async fn get_by_email(&self, email: &str) -> ServiceResult<Option<Admin>> {
        Ok(self.repo().get_admin_by_email(email).await?)
    }

    /// Checks an email/password pair.
    ///
    /// An unknown email still pays for a bcrypt verification at the
    /// configured cost, so both failures take comparable time.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<CredentialCheck> {
        let Some(admin) = self.get_by_email(email).await? else {
            verify_against_dummy(password, self.password_cost)?;
            return Ok(CredentialCheck::UnknownAccount);
        };

        if !verify_password(password, &admin.password_hash) {
            return Ok(CredentialCheck::WrongPassword);
        }

        Ok(CredentialCheck::Verified(admin.into()))
    }

    /// Creates the first administrator when the table is empty.
    ///
    /// # Returns
    /// The created administrator, or `None` if administrators already exist
    pub async fn ensure_bootstrap_admin(
        &self,
        bootstrap: &BootstrapAdmin,
    ) -> ServiceResult<Option<AdminView>> {
        if self.repo().count_admins().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .create(CreateAdmin {
                username: bootstrap.username.clone(),
                email: bootstrap.email.clone(),
                password: bootstrap.password.clone(),
                first_name: String::new(),
                last_name: String::new(),
                role: "admin".to_string(),
                is_active: true,
            })
            .await?;

        Ok(Some(admin))
    }
}
