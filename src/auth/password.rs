//! Password Hashing
//! Mission: One-way salted credential hashing with a tunable cost factor

use crate::error::ApiError;
use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::debug;

/// Bcrypt cost bounds (private in the `bcrypt` crate; mirrored here).
pub const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Longest plaintext accepted for hashing, in bytes.
const MAX_PASSWORD_BYTES: usize = 1024;

/// Password policy bounds enforced before any hashing happens.
const MIN_PASSWORD_CHARS: usize = 8;
const MAX_PASSWORD_CHARS: usize = 100;

/// Bcrypt-backed password hasher.
///
/// The cost factor is the throughput/security tradeoff knob: cost 12 keeps a
/// single verify in the tens of milliseconds on current hardware, which bounds
/// p99 login latency while staying expensive for offline cracking. Tests run
/// at `MIN_COST`.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Two calls with the same input produce different digests. Inputs above
    /// `MAX_PASSWORD_BYTES` are rejected before the hash backend is invoked.
    pub fn hash(&self, plaintext: &str) -> Result<String, ApiError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(ApiError::validation(
                "password",
                format!("Password must not exceed {MAX_PASSWORD_BYTES} bytes"),
            ));
        }

        hash(plaintext, self.cost).map_err(|e| {
            debug!("bcrypt hashing failed: {e}");
            ApiError::Internal("password hashing failed".to_string())
        })
    }

    /// Verify a plaintext against a stored digest.
    ///
    /// Malformed digests verify as `false`, never as an error - a corrupt
    /// stored hash must read as "wrong password", not a 500.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        verify(plaintext, digest).unwrap_or(false)
    }
}

/// Validate password strength: at least 8 characters, at most 100, with one
/// uppercase letter, one lowercase letter, and one digit.
///
/// Called by the gateway before hashing; a violation means the hasher is
/// never invoked.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let chars = password.chars().count();
    if chars < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_CHARS} characters"),
        ));
    }
    if chars > MAX_PASSWORD_CHARS {
        return Err(ApiError::validation(
            "password",
            format!("Password must be at most {MAX_PASSWORD_CHARS} characters"),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::validation(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ApiError::validation(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::validation(
            "password",
            "Password must contain at least one digit",
        ));
    }
    Ok(())
}
