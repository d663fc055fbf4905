//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the administrator and
//! session management APIs, excluding core authentication routes which are
//! handled separately.

pub mod admin;
pub mod common;
pub mod session;
