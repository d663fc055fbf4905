//! Database access layer.
//!
//! One repository per table. Repositories return `anyhow::Result` and are
//! wrapped by the services, which translate failures into `ServiceError`.

pub mod admin_repository;
pub mod session_repository;
