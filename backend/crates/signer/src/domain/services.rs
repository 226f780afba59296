//! Domain Services
//!
//! Pure request validation. No I/O, no side effects.

use crate::domain::entities::{SignRequest, ValidSignRequest};
use crate::domain::value_objects::{Account, BlindedQuery, PhoneHash};
use crate::error::ValidationError;

/// Limits applied by [`validate_sign_request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Serialized request must be strictly below this size
    pub max_request_bytes: usize,
    /// Accepted distance between `timestamp` and now, either direction
    pub timestamp_window_ms: i64,
}

/// Check a submitted request and produce its validated view.
///
/// `body_len` is the size of the request as the caller sent it, unknown keys
/// included. The cap applies to the larger of that and the canonical encoding.
/// `now_ms` is passed in so the check stays pure.
pub fn validate_sign_request(
    request: SignRequest,
    body_len: usize,
    policy: &ValidationPolicy,
    now_ms: i64,
) -> Result<ValidSignRequest, ValidationError> {
    let size = body_len.max(request.canonical_bytes().len());
    if size >= policy.max_request_bytes {
        return Err(ValidationError::TooLarge {
            max: policy.max_request_bytes,
            actual: size,
        });
    }

    let account = Account::parse(&request.account)?;
    let blinded_query = BlindedQuery::parse(&request.blinded_query_phone_number)?;
    let phone_hash = request
        .hashed_phone_number
        .as_deref()
        .map(PhoneHash::parse)
        .transpose()?;

    if let Some(timestamp) = request.timestamp {
        if !within_window(timestamp, now_ms, policy.timestamp_window_ms) {
            return Err(ValidationError::StaleTimestamp);
        }
    }

    Ok(ValidSignRequest {
        account,
        blinded_query,
        phone_hash,
        fingerprint: request.fingerprint(),
        raw: request,
    })
}

fn within_window(timestamp_ms: i64, now_ms: i64, window_ms: i64) -> bool {
    now_ms.abs_diff(timestamp_ms) <= window_ms.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::G2_COMPRESSED_LEN;

    const NOW: i64 = 1_700_000_000_000;

    fn policy() -> ValidationPolicy {
        ValidationPolicy {
            max_request_bytes: 4096,
            timestamp_window_ms: 300_000,
        }
    }

    fn request() -> SignRequest {
        SignRequest {
            account: "0x00000000000000000000000000000000000000aa".to_string(),
            blinded_query_phone_number: platform::crypto::to_base64(&[1u8; G2_COMPRESSED_LEN]),
            hashed_phone_number: None,
            timestamp: Some(NOW),
            session_id: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let valid = validate_sign_request(request(), 0, &policy(), NOW).unwrap();
        assert_eq!(valid.account.as_str(), "0x00000000000000000000000000000000000000aa");
        assert!(valid.phone_hash.is_none());
    }

    #[test]
    fn test_timestamp_window_edges() {
        let mut req = request();
        req.timestamp = Some(NOW - 300_000);
        assert!(validate_sign_request(req.clone(), 0, &policy(), NOW).is_ok());

        req.timestamp = Some(NOW + 300_001);
        assert_eq!(
            validate_sign_request(req, 0, &policy(), NOW).unwrap_err(),
            ValidationError::StaleTimestamp
        );
    }

    #[test]
    fn test_timestamp_is_optional() {
        let mut req = request();
        req.timestamp = None;
        assert!(validate_sign_request(req, 0, &policy(), 0).is_ok());
    }

    #[test]
    fn test_oversized_request_rejected() {
        let mut req = request();
        req.session_id = Some("x".repeat(5000));
        assert!(matches!(
            validate_sign_request(req, 0, &policy(), NOW),
            Err(ValidationError::TooLarge { max: 4096, .. })
        ));
    }

    #[test]
    fn test_raw_body_length_counts_toward_cap() {
        assert!(validate_sign_request(request(), 4095, &policy(), NOW).is_ok());
        assert_eq!(
            validate_sign_request(request(), 4096, &policy(), NOW).unwrap_err(),
            ValidationError::TooLarge {
                max: 4096,
                actual: 4096
            }
        );
    }

    #[test]
    fn test_bad_phone_hash_rejected() {
        let mut req = request();
        req.hashed_phone_number = Some("not-a-hash".to_string());
        assert_eq!(
            validate_sign_request(req, 0, &policy(), NOW).unwrap_err(),
            ValidationError::InvalidPhoneHash
        );
    }

    #[test]
    fn test_fingerprint_covers_optional_fields() {
        let a = request();
        let mut b = request();
        b.session_id = Some("s-1".to_string());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), request().fingerprint());
    }
}
