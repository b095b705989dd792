//! Mapping file access and logical-name resolution.

use std::path::{Path, PathBuf};

use common::AppResult;
use domain::mapping::find_mapping;
use domain::{EncryptionKey, MappingEntry};

use crate::infra::{atomic_write, read_file};

/// The mapping file: `name;path` lines, optionally encrypted.
#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    /// Mapping file at an explicit location
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the mapping file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all mappings
    pub fn load(&self, key: &EncryptionKey) -> AppResult<Vec<MappingEntry>> {
        let bytes = read_file(&self.path)?;
        let mappings: Vec<MappingEntry> = codec::decode(&bytes, key)?;

        tracing::debug!("Loaded {} mappings from {}", mappings.len(), self.path.display());
        Ok(mappings)
    }

    /// Replace the mapping file atomically
    pub fn save(&self, mappings: &[MappingEntry], key: &EncryptionKey) -> AppResult<()> {
        let bytes = codec::encode(mappings, key)?;
        atomic_write(&self.path, &bytes)?;

        tracing::debug!("Saved {} mappings to {}", mappings.len(), self.path.display());
        Ok(())
    }

    /// Path registered under `name`, exactly as stored.
    pub fn resolve(&self, key: &EncryptionKey, name: &str) -> AppResult<PathBuf> {
        let mappings = self.load(key)?;
        let path = find_mapping(&mappings, name)?;
        Ok(PathBuf::from(path))
    }
}

/// Resolve a logical name through the mapping file at `mapping_file`.
pub fn resolve(mapping_file: &Path, key: &EncryptionKey, name: &str) -> AppResult<PathBuf> {
    MappingStore::new(mapping_file).resolve(key, name)
}
