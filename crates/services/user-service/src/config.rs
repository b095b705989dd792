//! User service configuration.

use std::env;
use std::path::PathBuf;

use common::{AppResult, HashingConfig};
use domain::{Argon2Credentials, EncryptionKey, MAPPINGS_PATH};

use crate::repository::MappingStore;

/// User service configuration.
///
/// Convenience for callers: every store operation still takes its path and
/// key explicitly.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Location of the mapping file
    pub mappings_path: PathBuf,
    /// Key for store and mapping files (empty = plaintext, redacted in `Debug`)
    pub encryption_key: EncryptionKey,
    /// Argon2 cost for new digests
    pub hashing: HashingConfig,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl UserServiceConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = HashingConfig::default();
        Self {
            mappings_path: env::var("USER_SERVICE_MAPPINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(MAPPINGS_PATH)),
            encryption_key: env::var("USER_SERVICE_ENCRYPTION_KEY")
                .map(EncryptionKey::from)
                .unwrap_or_default(),
            hashing: HashingConfig {
                memory_kib: env_or("USER_SERVICE_HASH_MEMORY_KIB", defaults.memory_kib),
                iterations: env_or("USER_SERVICE_HASH_ITERATIONS", defaults.iterations),
                parallelism: env_or("USER_SERVICE_HASH_PARALLELISM", defaults.parallelism),
            },
        }
    }

    /// Build the Credential Manager for the configured cost.
    ///
    /// # Errors
    /// Returns validation error if argon2 rejects the cost.
    pub fn credentials(&self) -> AppResult<Argon2Credentials> {
        let HashingConfig {
            memory_kib,
            iterations,
            parallelism,
        } = self.hashing;
        Ok(Argon2Credentials::with_cost(memory_kib, iterations, parallelism)?)
    }

    /// The configured mapping file.
    pub fn mapping_store(&self) -> MappingStore {
        MappingStore::new(&self.mappings_path)
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            mappings_path: PathBuf::from(MAPPINGS_PATH),
            encryption_key: EncryptionKey::none(),
            hashing: HashingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UserServiceConfig::default();

        assert_eq!(config.mappings_path, PathBuf::from("data/mappings.txt"));
        assert!(config.encryption_key.is_empty());
        assert!(config.credentials().is_ok());
    }

    #[test]
    fn test_debug_hides_key() {
        let config = UserServiceConfig {
            encryption_key: EncryptionKey::new("super-secret-key"),
            ..UserServiceConfig::default()
        };

        assert!(!format!("{:?}", config).contains("super-secret-key"));
    }

    #[test]
    fn test_rejected_cost() {
        let config = UserServiceConfig {
            hashing: HashingConfig {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
            ..UserServiceConfig::default()
        };

        assert!(config.credentials().is_err());
    }
}
