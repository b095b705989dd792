//! AES-256-GCM envelope with HKDF-SHA256 key derivation.
//!
//! Encrypted content is ASCII: the `enc:v1:` header followed by standard
//! base64 of `salt || nonce || ciphertext_with_tag`. Every encryption draws a
//! fresh salt and nonce, so the same store never encrypts to the same bytes.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use common::{AppError, AppResult};
use domain::{EncryptionKey, FIELD_DELIMITER};

/// Marks encrypted content
pub const ENCRYPTED_HEADER: &[u8] = b"enc:v1:";

const SALT_SIZE: usize = 32;
const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;

/// HKDF info string used to domain-separate derived keys.
const HKDF_INFO: &[u8] = b"user-store-v1";

/// True if `bytes` are an encrypted envelope.
///
/// The header alone is not enough: a plaintext store may legitimately start
/// with `enc:v1:`. An envelope is header plus base64 and so never contains
/// the field delimiter, while every non-blank plaintext record line does.
pub fn is_encrypted(bytes: &[u8]) -> bool {
    bytes.starts_with(ENCRYPTED_HEADER) && !bytes.contains(&(FIELD_DELIMITER as u8))
}

fn derive_cipher(key: &EncryptionKey, salt: &[u8]) -> AppResult<Aes256Gcm> {
    let hk = Hkdf::<Sha256>::new(Some(salt), key.expose_bytes());
    let mut okm = Zeroizing::new([0u8; KEY_SIZE]);
    hk.expand(HKDF_INFO, &mut okm[..])
        .map_err(|e| AppError::internal(format!("Key derivation failed: {}", e)))?;

    Aes256Gcm::new_from_slice(&okm[..])
        .map_err(|e| AppError::internal(format!("Cipher setup failed: {}", e)))
}

/// Encrypt `plaintext` under `key`.
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> AppResult<Vec<u8>> {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let cipher = derive_cipher(key, &salt)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| AppError::internal(format!("Encryption failed: {}", e)))?;

    let mut payload = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    payload.extend_from_slice(&salt);
    payload.extend_from_slice(&nonce_bytes);
    payload.extend_from_slice(&ciphertext);

    let mut out = ENCRYPTED_HEADER.to_vec();
    out.extend_from_slice(STANDARD.encode(payload).as_bytes());
    Ok(out)
}

/// Decrypt content produced by [`encrypt`].
///
/// Any mismatch (missing header, bad base64, truncated payload, wrong key,
/// tampered bytes) is a `Decryption` error; garbage is never returned.
pub fn decrypt(key: &EncryptionKey, content: &[u8]) -> AppResult<Vec<u8>> {
    let encoded = content
        .strip_prefix(ENCRYPTED_HEADER)
        .ok_or_else(|| AppError::decryption("content is not encrypted"))?;

    let payload = STANDARD
        .decode(encoded.trim_ascii_end())
        .map_err(|e| AppError::decryption(format!("invalid encoding: {}", e)))?;

    if payload.len() < SALT_SIZE + NONCE_SIZE {
        return Err(AppError::decryption("ciphertext too short"));
    }

    let (salt, rest) = payload.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let cipher = derive_cipher(key, salt)?;
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| AppError::decryption("wrong key or corrupted ciphertext"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_encrypt_decrypt() {
        let key = EncryptionKey::generate();
        let plaintext = b"Alice;Smith;alice;alice@example.com;digest;0\n";

        let encrypted = encrypt(&key, plaintext).unwrap();
        assert!(is_encrypted(&encrypted));
        assert_eq!(decrypt(&key, &encrypted).unwrap(), plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = encrypt(&EncryptionKey::generate(), b"sensitive data").unwrap();
        let result = decrypt(&EncryptionKey::generate(), &encrypted);

        assert!(matches!(result, Err(AppError::Decryption(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = EncryptionKey::new("tamper-test");
        let encrypted = encrypt(&key, b"important secret").unwrap();

        let mut payload = STANDARD.decode(&encrypted[ENCRYPTED_HEADER.len()..]).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0xff;
        let mut tampered = ENCRYPTED_HEADER.to_vec();
        tampered.extend_from_slice(STANDARD.encode(payload).as_bytes());

        assert!(matches!(
            decrypt(&key, &tampered),
            Err(AppError::Decryption(_))
        ));
    }

    #[test]
    fn test_same_plaintext_encrypts_differently() {
        let key = EncryptionKey::generate();
        let a = encrypt(&key, b"same plaintext").unwrap();
        let b = encrypt(&key, b"same plaintext").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_envelopes() {
        let key = EncryptionKey::generate();

        assert!(matches!(
            decrypt(&key, b"plain;text"),
            Err(AppError::Decryption(_))
        ));
        assert!(matches!(
            decrypt(&key, b"enc:v1:!!!not base64!!!"),
            Err(AppError::Decryption(_))
        ));
        assert!(matches!(
            decrypt(&key, b"enc:v1:AAAA"),
            Err(AppError::Decryption(_))
        ));
    }

    #[test]
    fn test_header_prefixed_plaintext_is_not_encrypted() {
        let encrypted = encrypt(&EncryptionKey::generate(), b"A;B").unwrap();
        assert!(is_encrypted(&encrypted));

        assert!(!is_encrypted(b"enc:v1:Ann;Smith;ann;ann@example.com;hash;0\n"));
        assert!(!is_encrypted(b"plain;text"));
    }

    #[test]
    fn test_trailing_newline_tolerated() {
        let key = EncryptionKey::generate();
        let mut encrypted = encrypt(&key, b"payload").unwrap();
        encrypted.push(b'\n');

        assert_eq!(decrypt(&key, &encrypted).unwrap(), b"payload");
    }
}
