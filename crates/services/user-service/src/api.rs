//! Blob-compatible API.
//!
//! A "store" here is the plaintext serialized form of a user store (the
//! `first;last;username;email;digest;role` lines). Mutating calls take a
//! store and return the new store; encryption only happens when a store is
//! fetched from or saved to a file. Callers that prefer typed records use
//! [`fetch_users`], [`UserService`] and [`save_users`] directly.

use std::path::{Path, PathBuf};

use common::AppResult;
use domain::mapping;
use domain::{EncryptionKey, LoginOutcome, MappingEntry, NewUser, Role, UserRecord, MAPPINGS_PATH};

use crate::infra::atomic_write;
use crate::repository::{MappingStore, UserRepository, UserStore};
use crate::service::UserService;

// =============================================================================
// Mappings
// =============================================================================

/// Well-known relative location of the mapping file
pub fn get_mappings_path() -> PathBuf {
    PathBuf::from(MAPPINGS_PATH)
}

/// Load every mapping, in stored order
pub fn fetch_mappings(path: &Path, key: &EncryptionKey) -> AppResult<Vec<MappingEntry>> {
    MappingStore::new(path).load(key)
}

/// Replace the mapping file
pub fn save_mappings(mappings: &[MappingEntry], path: &Path, key: &EncryptionKey) -> AppResult<()> {
    MappingStore::new(path).save(mappings, key)
}

/// Path registered under `name`
pub fn resolve_mapping(path: &Path, key: &EncryptionKey, name: &str) -> AppResult<PathBuf> {
    MappingStore::new(path).resolve(key, name)
}

/// Register a new mapping in the mapping file
pub fn create_mapping(path: &Path, key: &EncryptionKey, name: &str, target: &str) -> AppResult<()> {
    let store = MappingStore::new(path);
    let mut mappings = store.load(key)?;
    mapping::create_mapping(&mut mappings, name, target)?;
    store.save(&mappings, key)?;

    tracing::info!("Created mapping {} -> {}", name, target);
    Ok(())
}

/// Point an existing mapping at a new path
pub fn update_mapping(path: &Path, key: &EncryptionKey, name: &str, target: &str) -> AppResult<()> {
    let store = MappingStore::new(path);
    let mut mappings = store.load(key)?;
    mapping::update_mapping(&mut mappings, name, target)?;
    store.save(&mappings, key)?;

    tracing::info!("Updated mapping {} -> {}", name, target);
    Ok(())
}

/// Remove a mapping, returning the removed entry
pub fn remove_mapping(path: &Path, key: &EncryptionKey, name: &str) -> AppResult<MappingEntry> {
    let store = MappingStore::new(path);
    let mut mappings = store.load(key)?;
    let removed = mapping::remove_mapping(&mut mappings, name)?;
    store.save(&mappings, key)?;

    tracing::info!("Removed mapping {}", name);
    Ok(removed)
}

// =============================================================================
// Store files
// =============================================================================

/// Load the user store at `path`
pub fn fetch_users(path: &Path, key: &EncryptionKey) -> AppResult<Vec<UserRecord>> {
    UserStore::new(path).load(key)
}

/// Load the user store at `path` as a plaintext store blob
pub fn fetch_users_blob(path: &Path, key: &EncryptionKey) -> AppResult<String> {
    let users = fetch_users(path, key)?;
    codec::encode_text(&users)
}

/// Persist typed records to `path` with atomic replace
pub fn save_users(users: &[UserRecord], path: &Path, key: &EncryptionKey) -> AppResult<()> {
    UserStore::new(path).save(users, key)
}

/// Persist a store blob to `path` with atomic replace.
///
/// The blob is parsed first, so a malformed store is rejected without
/// touching the destination.
pub fn save_users_blob(store: &str, path: &Path, key: &EncryptionKey) -> AppResult<()> {
    let users: Vec<UserRecord> = codec::decode_text(store)?;
    let bytes = codec::encode(&users, key)?;
    atomic_write(path, &bytes)?;

    tracing::debug!("Saved {} users to {}", users.len(), path.display());
    Ok(())
}

// =============================================================================
// User operations
// =============================================================================

fn records(store: &str) -> AppResult<Vec<UserRecord>> {
    codec::decode_text(store)
}

/// Decode, mutate, re-encode. The input store is never modified.
fn mutate<F>(store: &str, f: F) -> AppResult<String>
where
    F: FnOnce(&mut Vec<UserRecord>) -> AppResult<()>,
{
    let mut users = records(store)?;
    f(&mut users)?;
    codec::encode_text(&users)
}

/// All records of a store blob
pub fn list_users(service: &dyn UserService, store: &str) -> AppResult<Vec<UserRecord>> {
    Ok(service.list_users(&records(store)?))
}

/// Register a user, returning the new store.
///
/// `role` must be non-negative.
#[allow(clippy::too_many_arguments)]
pub fn register_user(
    service: &dyn UserService,
    store: &str,
    first_name: &str,
    last_name: &str,
    username: &str,
    email: &str,
    password: &str,
    role: i64,
) -> AppResult<String> {
    let role = Role::try_from(role)?;
    let new_user = NewUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
    };

    mutate(store, |users| service.register_user(users, new_user))
}

/// Log in by username or email
pub fn login_user(
    service: &dyn UserService,
    store: &str,
    identifier: &str,
    password: &str,
) -> AppResult<LoginOutcome> {
    login_user_records(service, &records(store)?, identifier, password)
}

/// Log in against already loaded records
pub fn login_user_records(
    service: &dyn UserService,
    users: &[UserRecord],
    identifier: &str,
    password: &str,
) -> AppResult<LoginOutcome> {
    service.login_user(users, identifier, password)
}

/// Delete one user, returning the new store
pub fn delete_user(service: &dyn UserService, store: &str, identifier: &str) -> AppResult<String> {
    mutate(store, |users| service.delete_user(users, identifier).map(|_| ()))
}

/// True if `identifier` names a user by username or email
pub fn user_exists(service: &dyn UserService, store: &str, identifier: &str) -> AppResult<bool> {
    Ok(service.user_exists(&records(store)?, identifier))
}

/// True if the username is taken
pub fn user_exists_username(service: &dyn UserService, store: &str, username: &str) -> AppResult<bool> {
    Ok(service.username_taken(&records(store)?, username))
}

/// True if the email is taken
pub fn user_exists_email(service: &dyn UserService, store: &str, email: &str) -> AppResult<bool> {
    Ok(service.email_taken(&records(store)?, email))
}

pub fn update_user_name(
    service: &dyn UserService,
    store: &str,
    identifier: &str,
    first_name: &str,
    last_name: &str,
) -> AppResult<String> {
    mutate(store, |users| {
        service.update_name(users, identifier, first_name, last_name)
    })
}

pub fn update_user_username(
    service: &dyn UserService,
    store: &str,
    identifier: &str,
    username: &str,
) -> AppResult<String> {
    mutate(store, |users| service.update_username(users, identifier, username))
}

pub fn update_user_email(
    service: &dyn UserService,
    store: &str,
    identifier: &str,
    email: &str,
) -> AppResult<String> {
    mutate(store, |users| service.update_email(users, identifier, email))
}

pub fn update_user_password(
    service: &dyn UserService,
    store: &str,
    identifier: &str,
    password: &str,
) -> AppResult<String> {
    mutate(store, |users| service.update_password(users, identifier, password))
}

/// Change a user's role; `role` must be non-negative.
pub fn update_user_role(
    service: &dyn UserService,
    store: &str,
    identifier: &str,
    role: i64,
) -> AppResult<String> {
    let role = Role::try_from(role)?;
    mutate(store, |users| service.update_role(users, identifier, role))
}
