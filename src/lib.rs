//! Study Vault Backend Library
//!
//! This library provides the core functionality for the Study Vault backend,
//! including account authentication, owner-scoped journal storage, and the
//! REST API service.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::ApiServer;
pub use crate::core::{Config, VaultError};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for the library
pub type Result<T> = anyhow::Result<T>;
