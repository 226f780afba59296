//! Key Share Provider

use blsttc::{SecretKey, SecretKeyShare};

use crate::domain::ports::KeyProvider;
use crate::domain::value_objects::KeyShare;
use crate::error::KeyProviderError;

/// Key share loaded once at startup and held in memory
pub struct StaticKeyProvider {
    share: KeyShare,
}

impl StaticKeyProvider {
    /// Parse a hex-encoded (optionally `0x`-prefixed) 32-byte key share
    pub fn from_hex(hex: &str) -> Result<Self, KeyProviderError> {
        let hex = hex.trim();
        if hex.is_empty() {
            return Err(KeyProviderError::Missing);
        }

        let bytes = platform::crypto::from_hex(hex)
            .map_err(|e| KeyProviderError::Malformed(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| KeyProviderError::Malformed(format!("expected 32 bytes, got {}", b.len())))?;

        SecretKeyShare::from_bytes(bytes)
            .map_err(|e| KeyProviderError::Malformed(format!("{e:?}")))?;

        Ok(Self {
            share: KeyShare::new(bytes),
        })
    }

    /// Fresh random share, for development only
    pub fn random() -> Self {
        Self {
            share: KeyShare::new(SecretKey::random().to_bytes()),
        }
    }
}

impl KeyProvider for StaticKeyProvider {
    fn key_share(&self) -> Result<KeyShare, KeyProviderError> {
        Ok(self.share.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_roundtrips_share() {
        let bytes = SecretKey::random().to_bytes();
        let provider = StaticKeyProvider::from_hex(&format!("0x{}", hex::encode(bytes))).unwrap();
        assert_eq!(provider.key_share().unwrap().expose(), &bytes);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            StaticKeyProvider::from_hex("  "),
            Err(KeyProviderError::Missing)
        ));
        assert!(matches!(
            StaticKeyProvider::from_hex("zz"),
            Err(KeyProviderError::Malformed(_))
        ));
        assert!(matches!(
            StaticKeyProvider::from_hex(&"ab".repeat(16)),
            Err(KeyProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_from_hex_rejects_scalar_out_of_range() {
        assert!(matches!(
            StaticKeyProvider::from_hex(&"ff".repeat(32)),
            Err(KeyProviderError::Malformed(_))
        ));
    }
}
