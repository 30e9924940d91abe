//! Error type system for Study Vault
//!
//! This module provides the error taxonomy shared by every component:
//! - Hierarchical error classification
//! - HTTP status code mapping
//! - Opaque API error bodies with trace IDs
//!
//! Two pairs of conditions are deliberately indistinguishable to callers:
//! "unknown email" vs "wrong password" on login, and "entry does not exist"
//! vs "entry belongs to someone else" on entry operations. Both collapse to a
//! single variant with a fixed message to prevent account/entry enumeration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed message for failed logins, identical for every credential failure.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Fixed message for entry lookups that miss, identical whether the entry is
/// absent or owned by another account.
pub const NOT_FOUND_OR_FORBIDDEN: &str = "Entry not found";

/// Main error type for the Study Vault system
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    InternalError(String),

    // Caller-attributable errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Access denied: {0}")]
    AuthorizationError(String),

    #[error("Entry not found")]
    NotFoundOrForbidden,

    // Blocking DB task panicked or was cancelled
    #[error("Task error: {0}")]
    TaskError(String),
}

impl VaultError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            VaultError::ValidationError(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized — missing or unparseable credentials
            VaultError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,

            // 403 Forbidden — well-formed but invalid/expired token
            VaultError::AuthorizationError(_) => StatusCode::FORBIDDEN,

            // 404 Not Found — also covers ownership mismatch
            VaultError::NotFoundOrForbidden => StatusCode::NOT_FOUND,

            // 409 Conflict — registration race or repeat
            VaultError::DuplicateEmail => StatusCode::CONFLICT,

            // 500 Internal Server Error
            VaultError::InitializationError(_)
            | VaultError::ConfigError(_)
            | VaultError::DatabaseError(_)
            | VaultError::IoError(_)
            | VaultError::InternalError(_)
            | VaultError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            VaultError::InitializationError(_) => "InitializationError",
            VaultError::ConfigError(_) => "ConfigError",
            VaultError::DatabaseError(_) => "DatabaseError",
            VaultError::IoError(_) => "IoError",
            VaultError::InternalError(_) => "InternalError",
            VaultError::ValidationError(_) => "ValidationError",
            VaultError::DuplicateEmail => "DuplicateEmail",
            VaultError::AuthenticationError(_) => "AuthenticationError",
            VaultError::AuthorizationError(_) => "AuthorizationError",
            VaultError::NotFoundOrForbidden => "NotFoundOrForbidden",
            VaultError::TaskError(_) => "TaskError",
        }
    }

    /// Whether the error is attributable to caller input (4xx) as opposed to
    /// an internal failure (5xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// The user-facing message for this error.
    ///
    /// Server-side failures are replaced by a generic message so persistence
    /// or hashing detail never reaches the caller; client errors pass their
    /// own message through.
    fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        }
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable, non-revealing error message
    pub message: String,
    /// Unique trace ID for correlating with server logs
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a VaultError
    pub fn from_error(error: &VaultError) -> Self {
        Self::new(error.error_type().to_string(), error.public_message())
    }
}

/// Implement IntoResponse for VaultError to enable automatic error handling in Axum
impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        // Full detail goes to the log, never to the wire
        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with VaultError
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            VaultError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VaultError::AuthenticationError("test".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            VaultError::AuthorizationError("test".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            VaultError::NotFoundOrForbidden.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VaultError::DuplicateEmail.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            VaultError::DatabaseError(rusqlite::Error::InvalidQuery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(VaultError::DuplicateEmail.error_type(), "DuplicateEmail");
        assert_eq!(
            VaultError::NotFoundOrForbidden.error_type(),
            "NotFoundOrForbidden"
        );
        assert_eq!(
            VaultError::ValidationError("test".into()).error_type(),
            "ValidationError"
        );
    }

    #[test]
    fn test_server_errors_are_masked() {
        let err = VaultError::DatabaseError(rusqlite::Error::InvalidQuery);
        let response = ErrorResponse::from_error(&err);

        assert_eq!(response.error, "DatabaseError");
        assert_eq!(response.message, "Internal server error");
        assert!(!response.trace_id.is_empty());
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = VaultError::ValidationError("title too long".into());
        let response = ErrorResponse::from_error(&err);

        assert!(response.message.contains("title too long"));
    }

    #[test]
    fn test_not_found_message_is_fixed() {
        // The body must not reveal whether the entry exists under another owner
        let response = ErrorResponse::from_error(&VaultError::NotFoundOrForbidden);
        assert_eq!(response.message, NOT_FOUND_OR_FORBIDDEN);
    }
}
