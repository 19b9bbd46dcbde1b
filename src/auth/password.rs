// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Password hashing (Argon2id, PHC string format).
//!
//! The stored form is a self-describing PHC string; verification parses it
//! back, so parameters can change without migrating existing hashes.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use super::AuthError;

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::InternalError(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::InternalError(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::InternalError(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verify a plaintext password against a stored PHC string.
///
/// An unparseable stored hash verifies as false rather than erroring; the
/// caller treats it the same as a wrong password.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(stored) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_correct_password() {
        let phc = hash_password("hunter22").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &phc));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let phc = hash_password("hunter22").unwrap();
        assert!(!verify_password("hunter23", &phc));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unparseable_stored_hash_verifies_false() {
        assert!(!verify_password("hunter22", "plaintext-left-over"));
        assert!(!verify_password("hunter22", ""));
    }
}
