//! Access secret hashing and verification.
//!
//! Document access passwords are stored as salted Argon2 hashes and verified
//! with the library's constant-time verifier. Plaintext secrets never reach
//! the registry or the logs.

use crate::AppError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

/// A fixed, valid Argon2 hash used to equalize the work done when a document
/// id does not exist. Verifying a submitted secret against it always fails,
/// but takes as long as a real verification, so unknown ids are not
/// distinguishable from wrong passwords by response timing.
pub const DUMMY_SECRET_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$bG9uZ2Vub3VnaHNhbHQ$kPTBRLY7x/meVN2WnMpTqGf5DO5BGcQdiNNGfhfJQ6o";

/// Hash an access secret for storage.
pub fn hash_secret(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash access secret: {}", e)))
}

/// Verify a submitted secret against a stored hash.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_secret() {
        let hash = hash_secret("p1").unwrap();

        assert!(verify_secret("p1", &hash).unwrap());
        assert!(!verify_secret("p2", &hash).unwrap());
        assert!(!verify_secret("", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_secret("same-secret").unwrap();
        let b = hash_secret("same-secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_does_not_contain_plaintext() {
        let hash = hash_secret("hunter2hunter2").unwrap();
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn test_dummy_hash_parses_and_rejects() {
        assert!(!verify_secret("anything", DUMMY_SECRET_HASH).unwrap());
    }
}
