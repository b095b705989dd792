//! User domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::constants::ROLE_STANDARD;
use crate::error::{DomainError, DomainResult};
use crate::validation::{validate_email, validate_name, validate_username};

/// Privilege tier of a user.
///
/// An open, small non-negative integer domain; `0` is a standard user and
/// higher tiers carry whatever meaning the caller assigns them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Role(u32);

impl Role {
    /// Standard (unprivileged) user
    pub const STANDARD: Role = Role(ROLE_STANDARD);

    /// Create a role from its numeric tier
    pub const fn new(tier: u32) -> Self {
        Role(tier)
    }

    /// Numeric tier as stored on disk
    pub fn tier(&self) -> u32 {
        self.0
    }

    /// Check if this is the standard tier
    pub fn is_standard(&self) -> bool {
        self.0 == ROLE_STANDARD
    }
}

impl From<u32> for Role {
    fn from(tier: u32) -> Self {
        Role(tier)
    }
}

impl TryFrom<i64> for Role {
    type Error = DomainError;

    fn try_from(value: i64) -> DomainResult<Self> {
        if value < 0 {
            return Err(DomainError::validation("role must be >= 0"));
        }
        u32::try_from(value)
            .map(Role)
            .map_err(|_| DomainError::validation(format!("role {} is out of range", value)))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user record as held in a store.
///
/// Field order matches the on-disk order:
/// `first_name;last_name;username;email;password_hash;role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl UserRecord {
    /// Check whether the identifier names this record by username
    pub fn has_username(&self, identifier: &str) -> bool {
        self.username == identifier
    }

    /// Check whether the identifier names this record by email
    pub fn has_email(&self, identifier: &str) -> bool {
        self.email == identifier
    }

    /// Update first and last name
    pub fn update_name(&mut self, first_name: String, last_name: String) {
        self.first_name = first_name;
        self.last_name = last_name;
    }

    /// Replace the stored digest
    pub fn update_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }

    /// Update the privilege tier
    pub fn update_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// Registration input. Holds the plaintext password until it is hashed.
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

// Don't expose the plaintext password in debug output
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl NewUser {
    /// Check every text field against the store's field rules.
    ///
    /// Password strength is checked separately by [`crate::Password`].
    pub fn validate(&self) -> DomainResult<()> {
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        Ok(())
    }

    /// Turn the input into a storable record using an already computed digest.
    pub fn into_record(self, password_hash: String) -> UserRecord {
        UserRecord {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            username: self.username,
            email: self.email,
            password_hash,
            role: self.role,
        }
    }
}

/// Result of a successful login. Never carries the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub username: String,
    pub role: Role,
}

impl From<&UserRecord> for LoginOutcome {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
        }
    }
}
