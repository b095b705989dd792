//! Domain-level errors.
//!
//! These errors represent business rule violations on user records and
//! mappings. They know nothing about files, ciphers or the line format.

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A field value contains a character reserved by the store format
    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    /// Password does not satisfy the strength policy
    #[error("Password error: {0}")]
    Password(String),

    /// Username or email already registered
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// No record matches the identifier
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Password did not verify against the stored digest
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No mapping registered under the logical name
    #[error("Mapping not found: {0}")]
    MappingNotFound(String),

    /// Mapping name or path already registered
    #[error("Mapping already exists: {0}")]
    DuplicateMapping(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create a duplicate user error
    pub fn duplicate_user(what: impl Into<String>) -> Self {
        DomainError::DuplicateUser(what.into())
    }

    /// Create a user not found error
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        DomainError::UserNotFound(identifier.into())
    }

    /// Create a mapping not found error
    pub fn mapping_not_found(name: impl Into<String>) -> Self {
        DomainError::MappingNotFound(name.into())
    }

    /// Create a duplicate mapping error
    pub fn duplicate_mapping(what: impl Into<String>) -> Self {
        DomainError::DuplicateMapping(what.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
