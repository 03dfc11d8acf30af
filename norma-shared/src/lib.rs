//! # Norma Shared Library
//!
//! This crate contains shared types, utilities, and business logic used
//! across the Norma API server and scanner worker.
//!
//! ## Module Organization
//!
//! - `models`: database models and data structures
//! - `auth`: authentication and authorization utilities
//! - `db`: connection pool and migrations
//! - `catalog`: static module catalog
//! - `entitlement`: module access resolution
//! - `billing`: webhook event verification and application
//! - `cnp`: national identification number validation

pub mod auth;
pub mod billing;
pub mod catalog;
pub mod cnp;
pub mod db;
pub mod entitlement;
pub mod models;

/// Current version of the Norma shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
