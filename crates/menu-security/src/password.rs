//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password does not match")]
    Mismatch,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<(), PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| PasswordError::Mismatch)
    }

    /// True when `value` is already a PHC hash string (`$argon2id$...`).
    pub fn is_hashed(value: &str) -> bool {
        PasswordHash::new(value).is_ok()
    }

    /// Accepts either a PHC hash or a plain secret from configuration.
    pub fn hash_if_plain(value: &str) -> Result<String, PasswordError> {
        if Self::is_hashed(value) {
            Ok(value.to_string())
        } else {
            Self::hash(value)
        }
    }
}
