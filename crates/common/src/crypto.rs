//! Password hashing shared across Hemolink crates
//!
//! Wraps bcrypt so that the cost factor lives in one place. bcrypt
//! generates a fresh random salt on every call, so re-hashing the same
//! password never reuses a salt, and verification is constant-effort.

use crate::error::{Error, Result};

/// bcrypt cost factor
const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with a freshly generated salt.
pub fn hash_password(plaintext: &str) -> Result<String> {
    bcrypt::hash(plaintext, BCRYPT_COST)
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored bcrypt hash.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> Result<bool> {
    bcrypt::verify(plaintext, stored_hash)
        .map_err(|e| Error::Internal(format!("Password verification failed: {}", e)))
}
