//! Domain layer - Core records, value objects and business rules.
//!
//! This crate contains pure domain logic with no file or cipher concerns.
//! All types here are shared by the codec and the user service.

pub mod constants;
pub mod error;
pub mod key;
pub mod mapping;
pub mod password;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use key::EncryptionKey;
pub use mapping::MappingEntry;
pub use password::{validate_password_strength, Argon2Credentials, CredentialManager, Password};
pub use user::{LoginOutcome, NewUser, Role, UserRecord};

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockCredentialManager;
