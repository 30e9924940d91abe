//! Authentication API handlers
//!
//! Registration and login. Hashing happens exactly here, at the moment a
//! password is supplied, never as a side effect of a generic save. Login
//! reports one identical error for "unknown email" and "wrong password" so
//! the endpoint cannot be used to enumerate accounts.

use crate::api::handlers::AppState;
use crate::auth::models::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};
use crate::auth::password::{hash_password, verify_password};
use crate::core::error::{Result, VaultError, INVALID_CREDENTIALS};
use crate::db::models::Account;
use crate::db::repository::normalize_email;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

/// Minimum password length accepted at registration
const MIN_PASSWORD_LEN: usize = 6;

/// Validate a normalized email address: one '@' with non-empty sides
fn validate_email(email: &str) -> Result<()> {
    let mut parts = email.split('@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || parts.next().is_some() {
        return Err(VaultError::ValidationError(
            "email address is not valid".to_string(),
        ));
    }
    Ok(())
}

/// Validate a registration password
fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(VaultError::ValidationError(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Handler for POST /api/auth/register - Account registration
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let email = normalize_email(&req.email);
    validate_email(&email)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password, state.bcrypt_cost)?;

    let account = Account {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    // Uniqueness is enforced by the store's UNIQUE constraint; a concurrent
    // duplicate registration surfaces here as DuplicateEmail.
    state.account_repo.create(&account).await?;

    tracing::info!(account_id = %account.id, "Account registered");

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Handler for POST /api/auth/login - Credential check and token issuance
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let email = normalize_email(&req.email);

    let account = state
        .account_repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| VaultError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&req.password, &account.password_hash) {
        tracing::warn!(account_id = %account.id, "Login with wrong password");
        return Err(VaultError::AuthenticationError(
            INVALID_CREDENTIALS.to_string(),
        ));
    }

    let issued = state.token_service.issue(&account.id)?;

    tracing::info!(account_id = %account.id, "Login successful");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at.to_rfc3339(),
        account: AccountResponse::from(account),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }
}
