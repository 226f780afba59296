//! Hashing and Encoding Utilities

use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex SHA-256 digest
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Encode bytes as base64 (standard alphabet, padded)
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 (standard alphabet, padded) to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Decode hex with an optional `0x` prefix
pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_hex_prefix(s))
}

/// Strip a leading `0x`/`0X`
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// True if `s` (after an optional `0x`) is exactly `digits` hex characters
pub fn is_hex_of_len(s: &str, digits: usize) -> bool {
    let body = strip_hex_prefix(s);
    body.len() == digits && body.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_base64_roundtrip() {
        let data = b"hello world";
        let encoded = to_base64(data);
        assert_eq!(from_base64(&encoded).unwrap(), data);
        assert!(from_base64("not base64!").is_err());
    }

    #[test]
    fn test_hex_prefix_handling() {
        assert_eq!(from_hex("0x0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(from_hex("0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(strip_hex_prefix("0Xff"), "ff");
    }

    #[test]
    fn test_is_hex_of_len() {
        assert!(is_hex_of_len("0xaabbccddeeff00112233445566778899aabbccdd", 40));
        assert!(is_hex_of_len("AABBCCDDEEFF00112233445566778899AABBCCDD", 40));
        assert!(!is_hex_of_len("0xaabb", 40));
        assert!(!is_hex_of_len("0xzzbbccddeeff00112233445566778899aabbccdd", 40));
    }
}
