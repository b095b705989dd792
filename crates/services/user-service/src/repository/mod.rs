//! Repository layer for store file access.

mod mapping_repository;
mod user_repository;

pub use mapping_repository::{resolve, MappingStore};
pub use user_repository::{transaction, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
