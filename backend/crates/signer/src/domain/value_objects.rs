//! Domain Value Objects
//!
//! Validated, immutable handles for the pieces of a sign request.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ValidationError;

/// Compressed BLS12-381 G2 point length
pub const G2_COMPRESSED_LEN: usize = 96;

/// Identity handle: `0x` + 40 hex digits, normalized to lower case
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account(String);

impl Account {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        let has_prefix = raw.starts_with("0x") || raw.starts_with("0X");
        if !has_prefix || !platform::crypto::is_hex_of_len(raw, 40) {
            return Err(ValidationError::InvalidAccount);
        }
        Ok(Self(format!(
            "0x{}",
            platform::crypto::strip_hex_prefix(raw).to_ascii_lowercase()
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Blinded query: base64 of a compressed G2 point.
///
/// Only the encoding is checked here; curve membership is the signature
/// engine's concern.
#[derive(Clone, PartialEq, Eq)]
pub struct BlindedQuery {
    encoded: String,
    bytes: [u8; G2_COMPRESSED_LEN],
}

impl BlindedQuery {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let decoded =
            platform::crypto::from_base64(raw).map_err(|_| ValidationError::InvalidBlindedQuery)?;
        let bytes: [u8; G2_COMPRESSED_LEN] = decoded
            .try_into()
            .map_err(|_| ValidationError::InvalidBlindedQuery)?;
        Ok(Self {
            encoded: raw.to_string(),
            bytes,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn bytes(&self) -> &[u8; G2_COMPRESSED_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for BlindedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BlindedQuery").field(&self.encoded).finish()
    }
}

/// Hashed phone number: 64 hex digits, optional `0x`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneHash(String);

impl PhoneHash {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if !platform::crypto::is_hex_of_len(raw, 64) {
            return Err(ValidationError::InvalidPhoneHash);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Dedup key: hex SHA-256 of the canonical request encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFingerprint(String);

impl RequestFingerprint {
    pub fn from_canonical_bytes(canonical: &[u8]) -> Self {
        Self(platform::crypto::sha256_hex(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Partial signature: base64 of a compressed G2 signature share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSignature(String);

impl PartialSignature {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(platform::crypto::to_base64(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Secret key share (32 bytes, big-endian scalar)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyShare([u8; 32]);

impl KeyShare {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn expose(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for KeyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyShare").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_normalizes_case() {
        let account = Account::parse("0xAABBCCDDEEFF00112233445566778899AABBCCDD").unwrap();
        assert_eq!(account.as_str(), "0xaabbccddeeff00112233445566778899aabbccdd");
    }

    #[test]
    fn test_account_rejects_bad_shapes() {
        assert!(Account::parse("").is_err());
        assert!(Account::parse("0xAA").is_err());
        assert!(Account::parse("aabbccddeeff00112233445566778899aabbccdd").is_err());
        assert!(Account::parse("0xgabbccddeeff00112233445566778899aabbccdd").is_err());
    }

    #[test]
    fn test_blinded_query_requires_96_bytes() {
        let ok = platform::crypto::to_base64(&[7u8; G2_COMPRESSED_LEN]);
        assert_eq!(BlindedQuery::parse(&ok).unwrap().bytes(), &[7u8; 96]);

        let short = platform::crypto::to_base64(&[7u8; 48]);
        assert_eq!(
            BlindedQuery::parse(&short),
            Err(ValidationError::InvalidBlindedQuery)
        );
        assert!(BlindedQuery::parse("B1").is_err());
    }

    #[test]
    fn test_phone_hash() {
        let hash = "ab".repeat(32);
        assert!(PhoneHash::parse(&hash).is_ok());
        assert!(PhoneHash::parse(&format!("0x{hash}")).is_ok());
        assert!(PhoneHash::parse("0x1234").is_err());
    }

    #[test]
    fn test_key_share_debug_is_redacted() {
        let share = KeyShare::new([9u8; 32]);
        assert!(!format!("{share:?}").contains('9'));
    }
}
