//! Service layer for user business logic.

mod user_service;

pub use user_service::{UserManager, UserService};
