//! Store file codec.
//!
//! Records are written one per line, fields separated by `;`, every line
//! terminated by `\n`. With a non-empty [`EncryptionKey`] the whole
//! serialized text is sealed by [`cipher`]; the empty key leaves it plain.
//!
//! Decoding is all-or-nothing: the first malformed line fails the whole
//! call and no partial sequence is returned.

pub mod cipher;
pub mod record;

pub use record::Record;

use common::{AppError, AppResult};
use domain::{EncryptionKey, FIELD_DELIMITER, RECORD_DELIMITER, RESERVED_CHARS};

/// Serialize records to their plaintext line format.
///
/// # Errors
/// `InvalidField` if any value contains `;`, `\n` or `\r`.
pub fn encode_text<R: Record>(records: &[R]) -> AppResult<String> {
    let mut out = String::new();

    for (index, record) in records.iter().enumerate() {
        let fields = record.fields();
        for (name, value) in R::FIELDS.iter().zip(fields.iter()) {
            if let Some(c) = value.chars().find(|c| RESERVED_CHARS.contains(c)) {
                return Err(AppError::invalid_field(
                    *name,
                    format!("record {} contains reserved character {:?}", index + 1, c),
                ));
            }
        }

        for (i, value) in fields.iter().enumerate() {
            if i > 0 {
                out.push(FIELD_DELIMITER);
            }
            out.push_str(value);
        }
        out.push(RECORD_DELIMITER);
    }

    Ok(out)
}

/// Parse the plaintext line format.
///
/// Blank lines are skipped; line numbers in errors are 1-based.
pub fn decode_text<R: Record>(text: &str) -> AppResult<Vec<R>> {
    let expected = R::FIELDS.len();
    let mut records = Vec::new();

    for (index, raw_line) in text.split(RECORD_DELIMITER).enumerate() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != expected {
            return Err(AppError::parse(
                index + 1,
                format!("expected {} fields, found {}", expected, fields.len()),
            ));
        }

        let record = R::from_fields(&fields).map_err(|msg| AppError::parse(index + 1, msg))?;
        records.push(record);
    }

    Ok(records)
}

/// Serialize and, for a non-empty key, encrypt.
pub fn encode<R: Record>(records: &[R], key: &EncryptionKey) -> AppResult<Vec<u8>> {
    let text = encode_text(records)?;

    if key.is_empty() {
        return Ok(text.into_bytes());
    }
    cipher::encrypt(key, text.as_bytes())
}

/// Decrypt (for a non-empty key) and parse.
///
/// Blank content is an empty store whatever the key.
pub fn decode<R: Record>(bytes: &[u8], key: &EncryptionKey) -> AppResult<Vec<R>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let plain = if key.is_empty() {
        if cipher::is_encrypted(bytes) {
            return Err(AppError::decryption(
                "content is encrypted but no key was supplied",
            ));
        }
        bytes.to_vec()
    } else {
        cipher::decrypt(key, bytes)?
    };

    let text = match String::from_utf8(plain) {
        Ok(text) => text,
        Err(e) if !key.is_empty() => {
            return Err(AppError::decryption(format!(
                "decrypted content is not UTF-8: {}",
                e.utf8_error()
            )));
        }
        Err(e) => {
            let valid_up_to = e.utf8_error().valid_up_to();
            let line = e.as_bytes()[..valid_up_to]
                .iter()
                .filter(|b| **b == b'\n')
                .count()
                + 1;
            return Err(AppError::parse(line, "content is not valid UTF-8"));
        }
    };

    let records = decode_text(&text)?;
    tracing::trace!("Decoded {} records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{MappingEntry, Role, UserRecord};

    fn user(username: &str, role: u32) -> UserRecord {
        UserRecord {
            first_name: "Test".to_string(),
            last_name: "Tester".to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "$argon2id$v=19$m=256,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            role: Role::new(role),
        }
    }

    #[test]
    fn test_round_trip_plain_and_encrypted() {
        let users = vec![user("alice", 0), user("bob", 2)];

        for key in [EncryptionKey::none(), EncryptionKey::generate()] {
            let bytes = encode(&users, &key).unwrap();
            let decoded: Vec<UserRecord> = decode(&bytes, &key).unwrap();
            assert_eq!(decoded, users);
        }
    }

    #[test]
    fn test_round_trip_header_lookalike_plaintext() {
        let mut lookalike = user("ann", 0);
        lookalike.first_name = "enc:v1:Ann".to_string();
        let users = vec![lookalike, user("bob", 1)];

        for key in [EncryptionKey::none(), EncryptionKey::generate()] {
            let bytes = encode(&users, &key).unwrap();
            let decoded: Vec<UserRecord> = decode(&bytes, &key).unwrap();
            assert_eq!(decoded, users);
        }
    }

    #[test]
    fn test_empty_key_is_plaintext() {
        let bytes = encode(&[user("alice", 1)], &EncryptionKey::none()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("Test;Tester;alice;alice@example.com;$argon2id$"));
        assert!(text.ends_with(";1\n"));
    }

    #[test]
    fn test_empty_input_decodes_to_empty_store() {
        let key = EncryptionKey::generate();
        assert!(decode::<UserRecord>(b"", &key).unwrap().is_empty());
        assert!(decode::<UserRecord>(b"\n\n", &EncryptionKey::none())
            .unwrap()
            .is_empty());

        let empty = encode::<UserRecord>(&[], &key).unwrap();
        assert!(decode::<UserRecord>(&empty, &key).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_field_count_names_line() {
        let text = "A;B;alice;alice@example.com;hash;0\nA;B;bob;bob@example.com;0\n";
        let result = decode::<UserRecord>(text.as_bytes(), &EncryptionKey::none());

        match result {
            Err(AppError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("expected 6 fields, found 5"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_role() {
        for role in ["admin", "-1", ""] {
            let text = format!("A;B;alice;alice@example.com;hash;{}\n", role);
            assert!(matches!(
                decode::<UserRecord>(text.as_bytes(), &EncryptionKey::none()),
                Err(AppError::Parse { line: 1, .. })
            ));
        }
    }

    #[test]
    fn test_crlf_lines_accepted() {
        let text = "A;B;alice;alice@example.com;hash;0\r\nA;B;bob;bob@example.com;hash;3\r\n";
        let users: Vec<UserRecord> = decode(text.as_bytes(), &EncryptionKey::none()).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].role, Role::new(3));
    }

    #[test]
    fn test_reserved_characters_rejected_at_encode() {
        let mut bad = user("alice", 0);
        bad.last_name = "Smi;th".to_string();

        match encode(&[user("bob", 0), bad], &EncryptionKey::none()) {
            Err(AppError::InvalidField { field, reason }) => {
                assert_eq!(field, "last_name");
                assert!(reason.contains("record 2"));
            }
            other => panic!("expected invalid field, got {:?}", other),
        }

        let mut bad = user("alice", 0);
        bad.email = "alice@example.com\nX;Y;eve;eve@example.com;h;9".to_string();
        assert!(matches!(
            encode(&[bad], &EncryptionKey::generate()),
            Err(AppError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_encrypted_content_without_key() {
        let bytes = encode(&[user("alice", 0)], &EncryptionKey::generate()).unwrap();
        assert!(matches!(
            decode::<UserRecord>(&bytes, &EncryptionKey::none()),
            Err(AppError::Decryption(_))
        ));
    }

    #[test]
    fn test_different_key_never_returns_records() {
        let bytes = encode(&[user("alice", 0)], &EncryptionKey::new("key-one")).unwrap();
        assert!(matches!(
            decode::<UserRecord>(&bytes, &EncryptionKey::new("key-two")),
            Err(AppError::Decryption(_))
        ));
    }

    #[test]
    fn test_plaintext_with_key_is_decryption_failure() {
        let bytes = encode(&[user("alice", 0)], &EncryptionKey::none()).unwrap();
        assert!(matches!(
            decode::<UserRecord>(&bytes, &EncryptionKey::generate()),
            Err(AppError::Decryption(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_names_line() {
        let mut bytes = b"A;B;alice;alice@example.com;hash;0\n".to_vec();
        bytes.extend_from_slice(&[b'A', 0xff, b';']);

        assert!(matches!(
            decode::<UserRecord>(&bytes, &EncryptionKey::none()),
            Err(AppError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_mapping_lines() {
        let text = "users;data/users.txt\nprojects;data/projects.txt\n";
        let mappings: Vec<MappingEntry> = decode_text(text).unwrap();

        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].path, "data/users.txt");
        assert_eq!(encode_text(&mappings).unwrap(), text);

        assert!(matches!(
            decode_text::<MappingEntry>("users\n"),
            Err(AppError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_mapping_lines_obey_entry_rules() {
        for (text, line) in [
            ("users;/etc/passwd\n", 1),
            ("users;data/users.txt\nx-y;data/x.txt\n", 2),
            ("users;data/users.txt\nsecret;../../secret\n", 2),
        ] {
            assert!(matches!(
                decode_text::<MappingEntry>(text),
                Err(AppError::Parse { line: l, .. }) if l == line
            ));
        }
    }

    #[test]
    fn test_role_must_be_plain_digits() {
        for role in [" 0", "0 ", "+1"] {
            let text = format!("A;B;alice;alice@example.com;hash;{}\n", role);
            assert!(matches!(
                decode::<UserRecord>(text.as_bytes(), &EncryptionKey::none()),
                Err(AppError::Parse { line: 1, .. })
            ));
        }
    }
}
