//! Field rules applied before a record is accepted into a store.
//!
//! Reserved characters are checked first so a value that would corrupt the
//! line format always reports `InvalidField`, whatever else is wrong with it.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::constants::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, RESERVED_CHARS};
use crate::error::{DomainError, DomainResult};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}][\p{L} '\-]*$").expect("name pattern compiles"));

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("username pattern compiles"));

/// Reject values containing a field or record delimiter.
pub fn ensure_no_reserved(field: &str, value: &str) -> DomainResult<()> {
    match value.chars().find(|c| RESERVED_CHARS.contains(c)) {
        Some(c) => Err(DomainError::invalid_field(
            field,
            format!("contains reserved character {:?}", c),
        )),
        None => Ok(()),
    }
}

/// Reject values that are empty once surrounding whitespace is removed.
pub fn ensure_not_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn ensure_max_length(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// First or last name: letters, spaces, hyphens and apostrophes.
pub fn validate_name(field: &str, value: &str) -> DomainResult<()> {
    ensure_no_reserved(field, value)?;
    ensure_not_empty(field, value)?;
    ensure_max_length(field, value, MAX_NAME_LENGTH)?;

    if !NAME_PATTERN.is_match(value) {
        return Err(DomainError::validation(format!(
            "{} contains an invalid character",
            field
        )));
    }
    Ok(())
}

/// Username: ASCII letters, digits, `_`, `.` and `-`.
pub fn validate_username(value: &str) -> DomainResult<()> {
    ensure_no_reserved("username", value)?;
    ensure_not_empty("username", value)?;
    ensure_max_length("username", value, MAX_USERNAME_LENGTH)?;

    if !USERNAME_PATTERN.is_match(value) {
        return Err(DomainError::validation(
            "username contains an invalid character",
        ));
    }
    Ok(())
}

/// Email: syntactically valid address.
pub fn validate_email(value: &str) -> DomainResult<()> {
    ensure_no_reserved("email", value)?;
    ensure_not_empty("email", value)?;
    ensure_max_length("email", value, MAX_EMAIL_LENGTH)?;

    if !value.validate_email() {
        return Err(DomainError::validation("Invalid email address"));
    }
    Ok(())
}
