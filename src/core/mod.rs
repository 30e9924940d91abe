//! Core application layer
//!
//! This module provides the cross-cutting concerns shared by every component:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{ErrorResponse, Result, VaultError};
pub use logging::Logger;
