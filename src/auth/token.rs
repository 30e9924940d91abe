//! Bearer token issuance and verification
//!
//! Tokens are HS256 JWTs carrying exactly two claims: the account identifier
//! (`sub`) and the expiry timestamp (`exp`). The signing secret and TTL are
//! injected once at construction from configuration; neither is ever logged.
//!
//! Verification distinguishes Malformed, Expired, and InvalidSignature for
//! observability, but all three collapse to the same opaque authorization
//! failure at the API boundary so callers cannot probe why a token failed.

use crate::core::error::VaultError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims: the account identifier is the sole identity claim
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Token verification failure kinds
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token is expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,
}

impl From<TokenError> for VaultError {
    fn from(err: TokenError) -> Self {
        // The kind reaches the log via the Display impl at the call site;
        // the wire sees one fixed message for all three kinds.
        tracing::debug!(kind = %err, "Token verification failed");
        VaultError::AuthorizationError("Invalid or expired token".to_string())
    }
}

/// A freshly issued bearer token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed, expiring bearer tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the configured signing secret and TTL
    ///
    /// The TTL is a fixed policy value, not a per-call parameter.
    pub fn new(secret: &str, ttl: chrono::Duration) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact: a token is rejected the moment `exp` has passed
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            validation,
        }
    }

    /// Issue a signed token for the given account identifier
    pub fn issue(&self, account_id: &str) -> crate::core::error::Result<IssuedToken> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| {
                VaultError::InternalError("Failed to calculate token expiration".to_string())
            })?;

        let claims = Claims {
            sub: account_id.to_string(),
            exp: expires_at.timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| VaultError::InternalError(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and extract the account identifier it was issued for
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::InvalidSignature
                    }
                    _ => TokenError::Malformed,
                }
            })?;

        Ok(token_data.claims.sub)
    }

    /// The configured token lifetime
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }
}
