//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Store Format
// =============================================================================

/// Separates the fields of one record
pub const FIELD_DELIMITER: char = ';';

/// Separates records
pub const RECORD_DELIMITER: char = '\n';

/// Characters no field value may contain
pub const RESERVED_CHARS: &[char] = &[FIELD_DELIMITER, RECORD_DELIMITER, '\r'];

/// Fixed, well-known location of the mapping file (relative to the data root)
pub const MAPPINGS_PATH: &str = "data/mappings.txt";

/// Logical name under which the user store is mapped
pub const USERS_MAPPING: &str = "users";

// =============================================================================
// User Roles
// =============================================================================

/// Privilege tier of a standard user
pub const ROLE_STANDARD: u32 = 0;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum length of first and last names
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 100;

/// Maximum email length (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum mapping name length
pub const MAX_MAPPING_NAME_LENGTH: usize = 100;

// =============================================================================
// Encryption
// =============================================================================

/// Raw length of a generated encryption key, before encoding
pub const ENCRYPTION_KEY_BYTES: usize = 32;
