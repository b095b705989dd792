//! User Service Library
//!
//! Encrypted, file-backed user stores with logical-name mappings.
//!
//! A store is loaded whole, operated on in memory through [`UserService`]
//! and persisted whole with an atomic replace. Path and key are passed on
//! every call; [`config::UserServiceConfig`] only helps callers assemble
//! them.
//!
//! # Concurrency
//!
//! Operations are synchronous and keep no shared state, so independent
//! calls (e.g. many logins) can run on separate threads. Saves never leave
//! a half-written file, but nothing here serializes load-mutate-save cycles
//! from different processes: the last writer wins. Callers that need more
//! must wrap the cycle in their own lock.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

pub use config::UserServiceConfig;
pub use repository::{resolve, transaction, MappingStore, UserRepository, UserStore};
pub use service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use repository::MockUserRepository;
