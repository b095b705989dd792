//! Common utilities shared by the codec and the user service.
//!
//! This crate provides:
//! - Unified error handling for store operations
//! - Shared configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
