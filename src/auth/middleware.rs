//! Authentication middleware
//!
//! The request gate in front of every protected route. It is a pure function
//! of the Authorization header: no persistent state, no I/O beyond token
//! verification.
//!
//! - Header absent or not in the bearer scheme: 401 before any verification.
//! - Token present but failing verification: 403, one opaque message.
//! - Token valid: an immutable `AuthAccount` identity is attached to the
//!   request and handlers receive it as an extractor argument. The identity
//!   is the only thing the gate adds; it never mutates anything else.

use crate::api::handlers::AppState;
use crate::core::error::{Result, VaultError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The authenticated identity resolved for one request
#[derive(Clone, Debug)]
pub struct AuthAccount {
    pub account_id: String,
}

/// Authentication middleware for protected routes
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").map(|t| t.to_string()));

    let token = match token {
        Some(t) => t,
        None => {
            return VaultError::AuthenticationError("Missing bearer token".to_string())
                .into_response();
        }
    };

    match state.token_service.verify(&token) {
        Ok(account_id) => {
            request.extensions_mut().insert(AuthAccount { account_id });
            next.run(request).await
        }
        Err(e) => VaultError::from(e).into_response(),
    }
}

// Extraction of the authenticated identity in handlers. Reaching this without
// the middleware having run is a routing mistake, reported as 401.
#[async_trait]
impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
{
    type Rejection = VaultError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthAccount>()
            .cloned()
            .ok_or_else(|| {
                VaultError::AuthenticationError("Request is not authenticated".to_string())
            })
    }
}
