//! crates/speech_core/src/password.rs
//!
//! Password hashing and verification using Argon2, a deliberately slow,
//! salted, adaptive one-way hash. The salt is embedded in the PHC-format
//! output string, so no separate salt storage is needed.

use crate::ports::{PortError, PortResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hashes a plaintext password with a freshly generated random salt.
pub fn hash_password(plain: &str) -> PortResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| PortError::Storage(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored hash.
///
/// Fails closed: a malformed stored hash yields `false` rather than an error,
/// so a corrupt credential row can never authenticate and never panics into
/// caller-visible state.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("secret").unwrap();
        assert!(verify_password("secret", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("secret").unwrap();
        assert!(!verify_password("not-the-secret", &hash));
    }

    #[test]
    fn each_hash_uses_a_fresh_salt() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn malformed_stored_hash_fails_closed() {
        assert!(!verify_password("secret", "not-a-phc-string"));
        assert!(!verify_password("secret", ""));
        assert!(!verify_password("secret", "$argon2id$truncated"));
    }
}
