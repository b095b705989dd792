//! User service - Handles user-related business logic.
//!
//! Every operation works on an in-memory store (`[UserRecord]`) that the
//! caller loaded and will persist. Mutating operations check everything
//! first and touch the store only as their final step, so an error always
//! leaves the store exactly as it was.

use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::validation::{validate_email, validate_name, validate_username};
use domain::{
    validate_password_strength, CredentialManager, DomainError, LoginOutcome, NewUser, Password,
    Role, UserRecord,
};

/// User service trait for dependency injection.
///
/// Identifiers are matched case-sensitively, by username first and by
/// email second.
pub trait UserService: Send + Sync {
    /// All records, in stored order
    fn list_users(&self, users: &[UserRecord]) -> Vec<UserRecord>;

    /// Get the record named by `identifier`
    fn find_user<'a>(&self, users: &'a [UserRecord], identifier: &str) -> AppResult<&'a UserRecord>;

    /// Validate, hash and append a new user
    fn register_user(&self, users: &mut Vec<UserRecord>, new_user: NewUser) -> AppResult<()>;

    /// Check a password for the user named by `identifier`
    fn login_user(&self, users: &[UserRecord], identifier: &str, password: &str)
        -> AppResult<LoginOutcome>;

    /// Remove exactly one user, returning the removed record
    fn delete_user(&self, users: &mut Vec<UserRecord>, identifier: &str) -> AppResult<UserRecord>;

    /// Check whether `identifier` names a user by username or email
    fn user_exists(&self, users: &[UserRecord], identifier: &str) -> bool;

    /// Check whether a username is taken
    fn username_taken(&self, users: &[UserRecord], username: &str) -> bool;

    /// Check whether an email is taken
    fn email_taken(&self, users: &[UserRecord], email: &str) -> bool;

    /// Replace first and last name
    fn update_name(
        &self,
        users: &mut [UserRecord],
        identifier: &str,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<()>;

    /// Rename a user; the new username must be free
    fn update_username(&self, users: &mut [UserRecord], identifier: &str, username: &str)
        -> AppResult<()>;

    /// Change a user's email; the new email must be free
    fn update_email(&self, users: &mut [UserRecord], identifier: &str, email: &str) -> AppResult<()>;

    /// Store a fresh digest for a new password
    fn update_password(&self, users: &mut [UserRecord], identifier: &str, password: &str)
        -> AppResult<()>;

    /// Change a user's privilege tier
    fn update_role(&self, users: &mut [UserRecord], identifier: &str, role: Role) -> AppResult<()>;
}

/// Concrete implementation of UserService using a Credential Manager.
#[derive(Clone)]
pub struct UserManager {
    credentials: Arc<dyn CredentialManager>,
}

impl UserManager {
    /// Create new user service instance with a Credential Manager
    pub fn new(credentials: Arc<dyn CredentialManager>) -> Self {
        Self { credentials }
    }
}

/// Index of the record named by `identifier`: username pass, then email pass.
fn position(users: &[UserRecord], identifier: &str) -> Option<usize> {
    users
        .iter()
        .position(|u| u.has_username(identifier))
        .or_else(|| users.iter().position(|u| u.has_email(identifier)))
}

fn position_or_not_found(users: &[UserRecord], identifier: &str) -> AppResult<usize> {
    position(users, identifier).ok_or_user_not_found(identifier)
}

impl UserService for UserManager {
    fn list_users(&self, users: &[UserRecord]) -> Vec<UserRecord> {
        users.to_vec()
    }

    fn find_user<'a>(&self, users: &'a [UserRecord], identifier: &str) -> AppResult<&'a UserRecord> {
        let index = position_or_not_found(users, identifier)?;
        Ok(&users[index])
    }

    fn register_user(&self, users: &mut Vec<UserRecord>, new_user: NewUser) -> AppResult<()> {
        new_user.validate()?;
        validate_password_strength(&new_user.password)?;

        if self.username_taken(users, &new_user.username) {
            return Err(DomainError::duplicate_user(format!("username {}", new_user.username)).into());
        }
        if self.email_taken(users, &new_user.email) {
            return Err(DomainError::duplicate_user(format!("email {}", new_user.email)).into());
        }

        let password_hash = self.credentials.hash_password(&new_user.password)?;
        let record = new_user.into_record(password_hash);

        tracing::info!("Registered user {} with role {}", record.username, record.role);
        users.push(record);
        Ok(())
    }

    fn login_user(
        &self,
        users: &[UserRecord],
        identifier: &str,
        password: &str,
    ) -> AppResult<LoginOutcome> {
        let user = match position(users, identifier) {
            Some(index) => &users[index],
            None => {
                tracing::warn!("Login failed: no user matches {}", identifier);
                return Err(AppError::UserNotFound(identifier.to_string()));
            }
        };

        let stored = Password::from_hash(user.password_hash.as_str());
        if !stored.verify(password, self.credentials.as_ref()) {
            tracing::warn!("Login failed: wrong password for {}", user.username);
            return Err(AppError::InvalidCredentials);
        }

        tracing::debug!("User {} logged in", user.username);
        Ok(LoginOutcome::from(user))
    }

    fn delete_user(&self, users: &mut Vec<UserRecord>, identifier: &str) -> AppResult<UserRecord> {
        let index = position_or_not_found(users, identifier)?;
        let removed = users.remove(index);

        tracing::info!("Deleted user {}", removed.username);
        Ok(removed)
    }

    fn user_exists(&self, users: &[UserRecord], identifier: &str) -> bool {
        position(users, identifier).is_some()
    }

    fn username_taken(&self, users: &[UserRecord], username: &str) -> bool {
        users.iter().any(|u| u.has_username(username))
    }

    fn email_taken(&self, users: &[UserRecord], email: &str) -> bool {
        users.iter().any(|u| u.has_email(email))
    }

    fn update_name(
        &self,
        users: &mut [UserRecord],
        identifier: &str,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<()> {
        validate_name("first_name", first_name)?;
        validate_name("last_name", last_name)?;
        let index = position_or_not_found(users, identifier)?;

        users[index].update_name(first_name.trim().to_string(), last_name.trim().to_string());
        Ok(())
    }

    fn update_username(
        &self,
        users: &mut [UserRecord],
        identifier: &str,
        username: &str,
    ) -> AppResult<()> {
        validate_username(username)?;
        let index = position_or_not_found(users, identifier)?;

        if users
            .iter()
            .enumerate()
            .any(|(i, u)| i != index && u.has_username(username))
        {
            return Err(DomainError::duplicate_user(format!("username {}", username)).into());
        }

        tracing::info!("Renamed user {} to {}", users[index].username, username);
        users[index].username = username.to_string();
        Ok(())
    }

    fn update_email(&self, users: &mut [UserRecord], identifier: &str, email: &str) -> AppResult<()> {
        validate_email(email)?;
        let index = position_or_not_found(users, identifier)?;

        if users
            .iter()
            .enumerate()
            .any(|(i, u)| i != index && u.has_email(email))
        {
            return Err(DomainError::duplicate_user(format!("email {}", email)).into());
        }

        users[index].email = email.to_string();
        Ok(())
    }

    fn update_password(
        &self,
        users: &mut [UserRecord],
        identifier: &str,
        password: &str,
    ) -> AppResult<()> {
        let index = position_or_not_found(users, identifier)?;
        let digest = Password::new(password, self.credentials.as_ref())?;

        users[index].update_password_hash(digest.into_string());
        tracing::info!("Password changed for {}", users[index].username);
        Ok(())
    }

    fn update_role(&self, users: &mut [UserRecord], identifier: &str, role: Role) -> AppResult<()> {
        let index = position_or_not_found(users, identifier)?;

        users[index].update_role(role);
        tracing::info!("Role of {} set to {}", users[index].username, role);
        Ok(())
    }
}
