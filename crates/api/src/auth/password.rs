//! Staff account passwords.
//!
//! Stored as Argon2id PHC strings, so the salt and cost parameters travel
//! with each hash and old hashes keep verifying if the defaults change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Shortest password accepted when an admin creates or resets an account.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Failure inside the hashing library. A wrong password is not an error;
/// [`verify_password`] reports it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(argon2::password_hash::Error);

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError)
}

/// Check `password` against a stored hash. A stored value that is not a PHC
/// string is an error, not a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(PasswordError)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError(e)),
    }
}

/// Length policy for new passwords, counted in characters.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_is_argon2id_and_salted() {
        let first = hash_password("staff-secret-1").unwrap();
        let second = hash_password("staff-secret-1").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("staff-secret-1", &first).unwrap());
        assert!(verify_password("staff-secret-1", &second).unwrap());
    }

    #[test]
    fn wrong_password_is_a_mismatch_not_an_error() {
        let hash = hash_password("staff-secret-1").unwrap();
        assert!(!verify_password("staff-secret-2", &hash).unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        let err = verify_password("anything", "plaintext-in-the-column").unwrap_err();
        assert!(err.to_string().starts_with("password hashing failed"));
    }

    #[test]
    fn length_policy_counts_characters() {
        assert!(validate_password_strength("eightchr", MIN_PASSWORD_LENGTH).is_ok());
        assert!(validate_password_strength("pässwör", MIN_PASSWORD_LENGTH).is_err());
        let msg = validate_password_strength("short", 12).unwrap_err();
        assert_eq!(msg, "Password must be at least 12 characters long");
    }
}
