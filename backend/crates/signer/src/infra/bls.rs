//! BLS Partial Signature Engine
//!
//! The blinded query is already a G2 point, so it is multiplied by the key
//! share directly; no hash-to-curve step is applied.

use blsttc::group::{CurveAffine, EncodedPoint};
use blsttc::pairing::bls12_381::G2Affine;
use blsttc::SecretKeyShare;

use crate::domain::ports::SignatureEngine;
use crate::domain::value_objects::{BlindedQuery, G2_COMPRESSED_LEN, KeyShare, PartialSignature};
use crate::error::SignatureEngineError;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlsSignatureEngine;

impl BlsSignatureEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Decode a compressed G2 point, checking curve and subgroup membership
pub(crate) fn g2_from_bytes(bytes: &[u8; G2_COMPRESSED_LEN]) -> Result<G2Affine, SignatureEngineError> {
    let mut compressed: <G2Affine as CurveAffine>::Compressed = EncodedPoint::empty();
    compressed.as_mut().copy_from_slice(bytes);
    compressed
        .into_affine()
        .map_err(|_| SignatureEngineError::InvalidPoint)
}

impl SignatureEngine for BlsSignatureEngine {
    fn sign(
        &self,
        blinded_query: &BlindedQuery,
        key_share: &KeyShare,
    ) -> Result<PartialSignature, SignatureEngineError> {
        let point = g2_from_bytes(blinded_query.bytes())?;
        let share = SecretKeyShare::from_bytes(*key_share.expose())
            .map_err(|_| SignatureEngineError::InvalidKeyShare)?;

        let signature = share.sign_g2(point);
        Ok(PartialSignature::from_bytes(&signature.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blsttc::{SecretKey, SignatureShare};

    fn blinded(seed: &[u8]) -> BlindedQuery {
        // Any signature is a valid G2 point
        let point = SecretKey::random().sign(seed).to_bytes();
        BlindedQuery::parse(&platform::crypto::to_base64(&point)).unwrap()
    }

    fn key_share() -> KeyShare {
        KeyShare::new(SecretKey::random().to_bytes())
    }

    #[test]
    fn test_signing_is_deterministic() {
        let engine = BlsSignatureEngine::new();
        let query = blinded(b"phone");
        let key = key_share();

        let first = engine.sign(&query, &key).unwrap();
        let second = engine.sign(&query, &key).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_signature_verifies_against_public_key_share() {
        let engine = BlsSignatureEngine::new();
        let query = blinded(b"phone");
        let key = key_share();

        let signature = engine.sign(&query, &key).unwrap();
        let bytes: [u8; G2_COMPRESSED_LEN] = platform::crypto::from_base64(signature.as_str())
            .unwrap()
            .try_into()
            .unwrap();
        let share = SignatureShare::from_bytes(bytes).unwrap();
        let public = SecretKeyShare::from_bytes(*key.expose())
            .unwrap()
            .public_key_share();

        assert!(public.verify_g2(&share, g2_from_bytes(query.bytes()).unwrap()));
    }

    #[test]
    fn test_different_shares_give_different_signatures() {
        let engine = BlsSignatureEngine::new();
        let query = blinded(b"phone");
        assert_ne!(
            engine.sign(&query, &key_share()).unwrap(),
            engine.sign(&query, &key_share()).unwrap()
        );
    }

    #[test]
    fn test_invalid_point_rejected() {
        let engine = BlsSignatureEngine::new();
        let query =
            BlindedQuery::parse(&platform::crypto::to_base64(&[0xffu8; G2_COMPRESSED_LEN])).unwrap();
        assert!(matches!(
            engine.sign(&query, &key_share()),
            Err(SignatureEngineError::InvalidPoint)
        ));
    }
}
