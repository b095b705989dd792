//! Shared configuration structures.

use serde::{Deserialize, Serialize};

/// Argon2 cost used when hashing new passwords.
///
/// Verification reads the cost from the stored digest, so changing these
/// values only affects passwords hashed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        // argon2 crate defaults (OWASP recommended minimum)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}
