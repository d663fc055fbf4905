//! Password hashing and verification using bcrypt.
//!
//! bcrypt embeds a random salt and the cost in the hash string, and its
//! verification compares digests in constant time.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{hash, verify};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// One throwaway hash per cost, computed on first use.
static DUMMY_HASHES: LazyLock<Mutex<HashMap<u32, String>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Hash a password before storing it in the database
///
/// # Errors
/// Returns `ServiceError::InternalError` if hashing fails (e.g. invalid cost)
pub fn hash_password(password: &str, cost: u32) -> ServiceResult<String> {
    hash(password, cost)
        .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored hash
///
/// A malformed stored hash counts as a mismatch rather than an error so that
/// login failures stay indistinguishable.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match verify(password, password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            false
        }
    }
}

fn dummy_hash(cost: u32) -> ServiceResult<String> {
    let mut hashes = DUMMY_HASHES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(existing) = hashes.get(&cost) {
        return Ok(existing.clone());
    }

    let generated = hash_password("dummy-password-never-matches", cost)?;
    hashes.insert(cost, generated.clone());
    Ok(generated)
}

/// Runs a full bcrypt verification whose result is discarded.
///
/// Used when no stored hash exists, so the caller spends the same work as a
/// real mismatch at `cost`.
pub fn verify_against_dummy(password: &str, cost: u32) -> ServiceResult<()> {
    let hash = dummy_hash(cost)?;
    verify_password(password, &hash);
    Ok(())
}
