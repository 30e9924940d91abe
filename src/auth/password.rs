//! Password hashing and verification using bcrypt
//!
//! bcrypt generates a fresh random salt per call and embeds the salt and work
//! factor in the hash string, so two hashes of the same plaintext differ and
//! verification needs no stored parameters beyond the hash itself.

use crate::core::error::{Result, VaultError};

/// Hash a password with the given bcrypt cost factor
///
/// Fails only on underlying randomness or resource exhaustion; that failure
/// is internal, not caller-attributable.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| VaultError::InternalError(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash
///
/// Returns false for a wrong password and also for a malformed stored hash;
/// "wrong password" is never an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
