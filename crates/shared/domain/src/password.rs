//! Password handling - Credential Manager and password value object.
//!
//! The adaptive hashing primitive is Argon2id. Its cost is fixed when the
//! manager is built; verification always reads the cost back from the
//! stored digest, so a digest hashed under an older cost still verifies.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hashes new passwords and verifies login attempts.
///
/// Implementations must not shortcut verification (no length pre-checks,
/// no early exits); timing is whatever the underlying primitive provides.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait CredentialManager: Send + Sync {
    /// Produce a fresh salted digest for `plain_text`
    fn hash_password(&self, plain_text: &str) -> DomainResult<String>;

    /// Check `plain_text` against a stored digest
    fn verify_password(&self, plain_text: &str, digest: &str) -> bool;
}

/// Argon2id-backed [`CredentialManager`].
#[derive(Clone)]
pub struct Argon2Credentials {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Argon2Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.argon2.params();
        f.debug_struct("Argon2Credentials")
            .field("m_cost", &params.m_cost())
            .field("t_cost", &params.t_cost())
            .field("p_cost", &params.p_cost())
            .finish()
    }
}

impl Default for Argon2Credentials {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2Credentials {
    /// Build a manager with an explicit cost.
    ///
    /// # Arguments
    /// * `memory_kib` - memory cost in KiB
    /// * `iterations` - number of passes
    /// * `parallelism` - degree of parallelism
    ///
    /// # Errors
    /// Returns validation error if argon2 rejects the parameter set.
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> DomainResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| DomainError::validation(format!("Invalid hashing cost: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialManager for Argon2Credentials {
    fn hash_password(&self, plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, plain_text: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored digest could not be parsed: {}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Check a plaintext password against the strength policy.
pub fn validate_password_strength(plain_text: &str) -> DomainResult<()> {
    if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::password(format!(
            "password should be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !plain_text.chars().any(|c| c.is_uppercase()) {
        return Err(DomainError::password(
            "password should contain at least 1 uppercase alphabetic character",
        ));
    }
    if !plain_text.chars().any(|c| c.is_lowercase()) {
        return Err(DomainError::password(
            "password should contain at least 1 lowercase alphabetic character",
        ));
    }
    if !plain_text.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::password(
            "password should contain at least 1 number",
        ));
    }
    Ok(())
}

/// Password value object holding a digest, never the plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Validate and hash a new plaintext password.
    ///
    /// # Errors
    /// Returns a password error if the policy rejects it, or an internal
    /// error if the hashing primitive fails.
    pub fn new(plain_text: &str, credentials: &dyn CredentialManager) -> DomainResult<Self> {
        validate_password_strength(plain_text)?;
        let hash = credentials.hash_password(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a digest read from a store.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the digest for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the digest.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plaintext password against this digest.
    pub fn verify(&self, plain_text: &str, credentials: &dyn CredentialManager) -> bool {
        credentials.verify_password(plain_text, &self.hash)
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Credentials {
        Argon2Credentials::with_cost(256, 1, 1).unwrap()
    }

    #[test]
    fn test_password_hash_and_verify() {
        let credentials = cheap();
        let password = Password::new("SecurePassword123!", &credentials).unwrap();

        assert!(password.verify("SecurePassword123!", &credentials));
        assert!(!password.verify("WrongPassword123", &credentials));
    }

    #[test]
    fn test_same_password_different_salts() {
        let credentials = cheap();
        let plain = "SamePassword123";
        let pass1 = Password::new(plain, &credentials).unwrap();
        let pass2 = Password::new(plain, &credentials).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain, &credentials));
        assert!(pass2.verify(plain, &credentials));
    }

    #[test]
    fn test_digest_verifies_under_different_configured_cost() {
        let digest = cheap().hash_password("Test123*").unwrap();
        let other = Argon2Credentials::with_cost(512, 2, 1).unwrap();

        assert!(other.verify_password("Test123*", &digest));
    }

    #[test]
    fn test_malformed_digest_does_not_verify() {
        assert!(!cheap().verify_password("Test123*", "not-a-phc-string"));
        assert!(!cheap().verify_password("Test123*", ""));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let result = Argon2Credentials::with_cost(1, 1, 1);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_strength_policy() {
        assert!(validate_password_strength("Test123*").is_ok());
        assert!(validate_password_strength("Test").is_err());
        assert!(validate_password_strength("testtest1").is_err());
        assert!(validate_password_strength("TESTTEST1").is_err());
        assert!(validate_password_strength("testTEST").is_err());
    }

    #[test]
    fn test_weak_password_never_reaches_hasher() {
        let mut mock = MockCredentialManager::new();
        mock.expect_hash_password().never();

        let result = Password::new("short", &mock);
        assert!(matches!(result, Err(DomainError::Password(_))));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::from_hash("$argon2id$secret");
        assert!(!format!("{:?}", password).contains("secret"));
    }
}
