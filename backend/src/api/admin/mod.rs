//! Administrator management API module.
//!
//! Contains the HTTP handlers and route definitions for creating, listing,
//! updating and deleting administrator accounts.

pub mod handlers;
pub mod routes;
