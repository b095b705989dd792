//! Line layouts of the record types kept in store files.

use std::borrow::Cow;

use domain::{MappingEntry, Role, UserRecord};

/// A record that serializes to one delimited line.
pub trait Record: Sized {
    /// Field names in on-disk order; the length is the expected field count.
    const FIELDS: &'static [&'static str];

    /// Field values in on-disk order
    fn fields(&self) -> Vec<Cow<'_, str>>;

    /// Build a record from exactly `FIELDS.len()` values.
    ///
    /// The error message is wrapped into a parse error naming the line.
    fn from_fields(fields: &[&str]) -> Result<Self, String>;
}

impl Record for UserRecord {
    const FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "username",
        "email",
        "password_hash",
        "role",
    ];

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.first_name.as_str()),
            Cow::Borrowed(self.last_name.as_str()),
            Cow::Borrowed(self.username.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.password_hash.as_str()),
            Cow::Owned(self.role.tier().to_string()),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let raw_role = fields[5];
        if raw_role.is_empty() || !raw_role.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("role `{}` is not a non-negative integer", raw_role));
        }
        let role = raw_role
            .parse::<u32>()
            .map_err(|_| format!("role `{}` is out of range", raw_role))?;

        Ok(UserRecord {
            first_name: fields[0].to_string(),
            last_name: fields[1].to_string(),
            username: fields[2].to_string(),
            email: fields[3].to_string(),
            password_hash: fields[4].to_string(),
            role: Role::new(role),
        })
    }
}

impl Record for MappingEntry {
    const FIELDS: &'static [&'static str] = &["name", "path"];

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.path.as_str()),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        MappingEntry::new(fields[0], fields[1]).map_err(|e| e.to_string())
    }
}
