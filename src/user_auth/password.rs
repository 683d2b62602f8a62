//! Password hashing (argon2id, PHC string format)

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    Hashing(String),

    #[error("Invalid hash format: {0}")]
    InvalidHash(String),

    #[error("Password does not match")]
    Mismatch,
}

/// Hash `password` with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hashed).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("secret123").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(verify_password("secret123", &hashed).is_ok());
    }

    #[test]
    fn test_wrong_password() {
        let hashed = hash_password("secret123").unwrap();
        assert_eq!(verify_password("secret124", &hashed), Err(PasswordError::Mismatch));
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("secret123", "plaintext"),
            Err(PasswordError::InvalidHash(_))
        ));
    }
}
