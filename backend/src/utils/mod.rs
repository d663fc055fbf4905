//! Collection of general utility functions.
//!
//! Token handling, password hashing and the field validators used by the
//! request DTOs.

pub mod jwt;
pub mod password;
pub mod validation;
