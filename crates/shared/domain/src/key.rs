//! Symmetric encryption key supplied by callers.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::ENCRYPTION_KEY_BYTES;

/// Key material for store encryption.
///
/// The empty key is a valid sentinel meaning "no encryption". Any other
/// string is used as key material as-is. The value is wiped on drop and
/// never shows up in debug output.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey(String);

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("EncryptionKey(<none>)")
        } else {
            f.write_str("EncryptionKey([REDACTED])")
        }
    }
}

impl EncryptionKey {
    /// Wrap caller-supplied key material
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The "no encryption" sentinel
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Generate a fresh random key, base64 encoded.
    pub fn generate() -> Self {
        let mut raw = [0u8; ENCRYPTION_KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut raw);
        let encoded = STANDARD.encode(raw);
        raw.zeroize();
        Self(encoded)
    }

    /// True when no encryption should be applied
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key material bytes
    pub fn expose_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for EncryptionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for EncryptionKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}
