//! Module for session management API endpoints.
//!
//! Lets an administrator inspect and revoke their own sessions and trigger
//! the expired-session sweep.

pub mod handlers;
pub mod models;
pub mod routes;
