//! File-backed user store.
//!
//! The store file is loaded whole, mutated in memory and written back whole.
//! Nothing here serializes writers from different processes: two
//! load-mutate-save cycles racing on the same file resolve last-write-wins.
//! Callers needing more must hold an external lock around the cycle.

use std::path::{Path, PathBuf};

use common::AppResult;
use domain::{EncryptionKey, UserRecord};

use crate::infra::{atomic_write, ensure_file, read_file};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// The key is passed on every call and never retained.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UserRepository: Send + Sync {
    /// Load every record, in stored order
    fn load(&self, key: &EncryptionKey) -> AppResult<Vec<UserRecord>>;

    /// Replace the stored records atomically
    fn save(&self, users: &[UserRecord], key: &EncryptionKey) -> AppResult<()>;
}

/// Concrete implementation of UserRepository over one store file
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Create new repository instance for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty store file if none exists yet.
    ///
    /// The empty file decodes to an empty store under any key.
    pub fn initialize(&self) -> AppResult<bool> {
        let created = ensure_file(&self.path)?;
        if created {
            tracing::info!("Created empty user store at {}", self.path.display());
        }
        Ok(created)
    }

    /// Load, mutate and persist this store in one call; see [`transaction`].
    pub fn transaction<T, F>(&self, key: &EncryptionKey, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Vec<UserRecord>) -> AppResult<T>,
    {
        transaction(self, key, f)
    }
}

impl UserRepository for UserStore {
    fn load(&self, key: &EncryptionKey) -> AppResult<Vec<UserRecord>> {
        let bytes = read_file(&self.path)?;
        let users: Vec<UserRecord> = codec::decode(&bytes, key)?;

        tracing::debug!("Loaded {} users from {}", users.len(), self.path.display());
        Ok(users)
    }

    fn save(&self, users: &[UserRecord], key: &EncryptionKey) -> AppResult<()> {
        let bytes = codec::encode(users, key)?;
        atomic_write(&self.path, &bytes)?;

        tracing::debug!("Saved {} users to {}", users.len(), self.path.display());
        Ok(())
    }
}

/// Run one load -> mutate -> save cycle.
///
/// The records are persisted only if `f` succeeds; on error the file is
/// never touched and the error is returned as is.
pub fn transaction<T, F>(repo: &dyn UserRepository, key: &EncryptionKey, f: F) -> AppResult<T>
where
    F: FnOnce(&mut Vec<UserRecord>) -> AppResult<T>,
{
    let mut users = repo.load(key)?;
    let result = f(&mut users)?;
    repo.save(&users, key)?;
    Ok(result)
}
