//! Unified error handling for store operations.
//!
//! Every failure a caller can see is one `AppError` kind, specific enough to
//! tell "bad credentials" from "storage corrupted" from "file missing".

use std::path::{Path, PathBuf};

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Storage
    #[error("I/O failure during {op} on {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    // Users
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Mappings
    #[error("Mapping not found: {0}")]
    MappingNotFound(String),

    #[error("Mapping already exists: {0}")]
    DuplicateMapping(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // Internal
    #[error("Internal error")]
    Internal(String),
}

impl AppError {
    /// Get stable error code for callers
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Io { .. } => "IO_FAILURE",
            AppError::Decryption(_) => "DECRYPTION_FAILURE",
            AppError::Parse { .. } => "PARSE_ERROR",
            AppError::InvalidField { .. } => "INVALID_FIELD",
            AppError::DuplicateUser(_) => "DUPLICATE_USER",
            AppError::UserNotFound(_) => "USER_NOT_FOUND",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::MappingNotFound(_) => "MAPPING_NOT_FOUND",
            AppError::DuplicateMapping(_) => "DUPLICATE_MAPPING",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures caused by the persisted data or the file system,
    /// as opposed to the caller's input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            AppError::Io { .. } | AppError::Decryption(_) | AppError::Parse { .. }
        )
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),

            AppError::UserNotFound(_) | AppError::InvalidCredentials => {
                "Invalid username, email or password".to_string()
            }

            AppError::Io { op, path, source } => {
                tracing::error!("I/O failure during {} on {}: {}", op, path.display(), source);
                "The store could not be accessed".to_string()
            }
            AppError::Decryption(msg) => {
                tracing::error!("Decryption failure: {}", msg);
                "The store could not be decrypted".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::InvalidField { field, reason } => AppError::InvalidField { field, reason },
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::DuplicateUser(msg) => AppError::DuplicateUser(msg),
            DomainError::UserNotFound(id) => AppError::UserNotFound(id),
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::MappingNotFound(name) => AppError::MappingNotFound(name),
            DomainError::DuplicateMapping(name) => AppError::DuplicateMapping(name),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_user_not_found(self, identifier: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_user_not_found(self, identifier: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::UserNotFound(identifier.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn io(op: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn decryption(msg: impl Into<String>) -> Self {
        AppError::Decryption(msg.into())
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        AppError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
