//! # Synapse Shared Library
//!
//! This crate contains the persistence schema bindings, the ownership-scoped
//! entity access layer, and the identity utilities used by the Synapse API
//! server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pooling and migrations
//! - `models`: Entity models and their ownership-scoped CRUD operations
//! - `provisioning`: First sign-in setup (user row + default project)
//! - `auth`: Identity token validation and request auth context
//! - `calendar`: Day/month windows and calendar event mapping
//! - `error`: Access-layer error types

pub mod auth;
pub mod calendar;
pub mod db;
pub mod error;
pub mod models;
pub mod provisioning;

/// Current version of the Synapse shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
