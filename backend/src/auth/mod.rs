//! Authentication module for administrator sessions and access control.
//!
//! This module provides login, token refresh, logout and the middleware
//! guarding every administrative endpoint.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
