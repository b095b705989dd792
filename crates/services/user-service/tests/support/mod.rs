//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use common::{AppError, AppResult};
use domain::{Argon2Credentials, EncryptionKey, NewUser, Role, UserRecord};
use user_service_lib::{UserManager, UserRepository};

static INIT: Once = Once::new();

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .init();
    });
}

/// Argon2 with the smallest cost it accepts
pub fn cheap_credentials() -> Argon2Credentials {
    Argon2Credentials::with_cost(256, 1, 1).unwrap()
}

pub fn manager() -> UserManager {
    init_logging();
    UserManager::new(Arc::new(cheap_credentials()))
}

pub fn new_user(username: &str) -> NewUser {
    NewUser {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "Test123*".to_string(),
        role: Role::STANDARD,
    }
}

/// In-memory repository that counts saves instead of writing files
pub struct RecordingRepository {
    users: Vec<UserRecord>,
    fail_load: bool,
    saves: AtomicUsize,
}

impl RecordingRepository {
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            fail_load: false,
            saves: AtomicUsize::new(0),
        }
    }

    /// Every load fails as if the key were wrong
    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::with_users(Vec::new())
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl UserRepository for RecordingRepository {
    fn load(&self, _key: &EncryptionKey) -> AppResult<Vec<UserRecord>> {
        if self.fail_load {
            return Err(AppError::decryption("authentication tag mismatch"));
        }
        Ok(self.users.clone())
    }

    fn save(&self, _users: &[UserRecord], _key: &EncryptionKey) -> AppResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
