//! Mapping entries: logical entity name to relative store path.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_MAPPING_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};
use crate::validation::{ensure_no_reserved, ensure_not_empty};

/// One `name;path` line of the mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub name: String,
    pub path: String,
}

impl MappingEntry {
    /// Create a validated entry.
    pub fn new(name: &str, path: &str) -> DomainResult<Self> {
        validate_mapping_name(name)?;
        validate_mapping_path(path)?;

        Ok(Self {
            name: name.trim().to_string(),
            path: path.trim().to_string(),
        })
    }
}

/// Mapping names: ASCII letters, digits and `_`.
pub fn validate_mapping_name(name: &str) -> DomainResult<()> {
    ensure_no_reserved("name", name)?;
    ensure_not_empty("name", name)?;

    let name = name.trim();
    if name.len() > MAX_MAPPING_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "mapping name must be at most {} characters",
            MAX_MAPPING_NAME_LENGTH
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DomainError::validation(format!(
            "mapping name contains an invalid character ({})",
            name
        )));
    }
    Ok(())
}

/// Mapping paths must stay relative and below the data root.
pub fn validate_mapping_path(path: &str) -> DomainResult<()> {
    ensure_no_reserved("path", path)?;
    ensure_not_empty("path", path)?;

    let escapes = Path::new(path.trim())
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(DomainError::validation(format!(
            "mapping path must be relative without `..` ({})",
            path
        )));
    }
    Ok(())
}

/// Create a new mapping; fails if the name or the path is already used.
pub fn create_mapping(mappings: &mut Vec<MappingEntry>, name: &str, path: &str) -> DomainResult<()> {
    let entry = MappingEntry::new(name, path)?;

    if mappings
        .iter()
        .any(|m| m.name == entry.name || m.path == entry.path)
    {
        return Err(DomainError::duplicate_mapping(entry.name));
    }

    mappings.push(entry);
    Ok(())
}

/// Point an existing mapping at a new path.
pub fn update_mapping(mappings: &mut [MappingEntry], name: &str, path: &str) -> DomainResult<()> {
    let entry = MappingEntry::new(name, path)?;

    if mappings
        .iter()
        .any(|m| m.name != entry.name && m.path == entry.path)
    {
        return Err(DomainError::duplicate_mapping(entry.path));
    }

    let target = mappings
        .iter_mut()
        .find(|m| m.name == entry.name)
        .ok_or_else(|| DomainError::mapping_not_found(entry.name.clone()))?;
    target.path = entry.path;
    Ok(())
}

/// Remove a mapping by name.
pub fn remove_mapping(mappings: &mut Vec<MappingEntry>, name: &str) -> DomainResult<MappingEntry> {
    let index = mappings
        .iter()
        .position(|m| m.name == name)
        .ok_or_else(|| DomainError::mapping_not_found(name))?;
    Ok(mappings.remove(index))
}

/// Look up the path registered under `name`.
pub fn find_mapping<'a>(mappings: &'a [MappingEntry], name: &str) -> DomainResult<&'a str> {
    mappings
        .iter()
        .find(|m| m.name == name)
        .map(|m| m.path.as_str())
        .ok_or_else(|| DomainError::mapping_not_found(name))
}
