//! Module for core business logic services.
//!
//! This module encapsulates the administrator account service, the session
//! and token service, and the background sweep of expired sessions.

pub mod admin_service;
pub mod session_cleanup;
pub mod session_service;
