//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Account registration and login
//! - Bearer token issuance and verification
//! - Password hashing and verification
//! - Authentication middleware

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod token;

pub use handlers::{login, register};
pub use middleware::{authenticate, AuthAccount};
pub use password::{hash_password, verify_password};
pub use token::{Claims, IssuedToken, TokenError, TokenService};
