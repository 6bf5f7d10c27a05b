//! Password value object.
//!
//! Wraps an Argon2id digest so plaintext handling stays inside this
//! module. Hashing is self-salting; verification recomputes the digest
//! and compares in constant time.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Argon2id digest of an account password.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Keep digests out of debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password.
    ///
    /// Each call salts independently, so hashing the same plaintext
    /// twice yields different digests that both verify.
    ///
    /// # Errors
    /// Returns a validation error when the plaintext is shorter than
    /// the minimum length.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a digest loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// The PHC digest string.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the digest string for persistence.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plaintext candidate against this digest.
    ///
    /// Malformed digests and any internal verifier error report a
    /// mismatch rather than propagating.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_verification() {
        let password = Password::new("correct horse battery").unwrap();
        assert!(password.verify("correct horse battery"));
        assert!(!password.verify("correct horse staple"));
    }

    #[test]
    fn test_digest_survives_storage() {
        let original = Password::new("RestoredFromDb1!").unwrap();
        let restored = Password::from_hash(original.as_str().to_string());
        assert!(restored.verify("RestoredFromDb1!"));
    }

    #[test]
    fn test_salting_is_per_call() {
        let first = Password::new("SamePlaintext99").unwrap();
        let second = Password::new("SamePlaintext99").unwrap();
        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("SamePlaintext99"));
        assert!(second.verify("SamePlaintext99"));
    }

    #[test]
    fn test_digest_is_phc_encoded_argon2id() {
        let password = Password::new("LongEnough1!").unwrap();
        assert!(password.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_malformed_digest_never_verifies() {
        for garbage in ["", "not-a-digest", "$argon2id$broken"] {
            assert!(!Password::from_hash(garbage.to_string()).verify("anything"));
        }
    }

    #[test]
    fn test_unicode_plaintext_round_trips() {
        let password = Password::new("contraseña-ünïcödé-密码!").unwrap();
        assert!(password.verify("contraseña-ünïcödé-密码!"));
        assert!(!password.verify("contrasena-unicode-mima!"));
    }

    #[test]
    fn test_too_short_plaintext_is_rejected() {
        assert!(Password::new("short").is_err());
    }

    #[test]
    fn test_minimum_length_is_inclusive() {
        assert!(Password::new("12345678").is_ok());
    }
}
