//! Signed-body Authenticator
//!
//! The `Authorization` header carries a base64 Ed25519 signature over the
//! exact request body. It is checked against the key registered for the
//! claimed account.

use std::sync::Arc;

use ed25519_dalek::{Signature, VerifyingKey};

use crate::domain::ports::{AuthContext, Authenticator};
use crate::domain::repository::AccountKeyRepository;

pub struct SignedBodyAuthenticator<K>
where
    K: AccountKeyRepository,
{
    keys: Arc<K>,
}

impl<K> SignedBodyAuthenticator<K>
where
    K: AccountKeyRepository + Sync,
{
    pub fn new(keys: Arc<K>) -> Self {
        Self { keys }
    }
}

fn decode_signature(header: &str) -> Option<Signature> {
    let bytes = platform::crypto::from_base64(header.trim()).ok()?;
    Signature::from_slice(&bytes).ok()
}

impl<K> Authenticator for SignedBodyAuthenticator<K>
where
    K: AccountKeyRepository + Send + Sync,
{
    async fn authenticate(&self, ctx: AuthContext<'_>) -> bool {
        let account = &ctx.request.account;

        let Some(signature) = ctx.authorization.and_then(decode_signature) else {
            tracing::debug!(account = %account, "Missing or undecodable authorization");
            return false;
        };

        let key_bytes = match self.keys.registered_key(account).await {
            Ok(Some(key)) => key,
            Ok(None) => {
                tracing::debug!(account = %account, "No registered key for account");
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, account = %account, "Registered key lookup failed");
                return false;
            }
        };

        let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
            tracing::warn!(account = %account, "Registered key is not a valid Ed25519 point");
            return false;
        };

        key.verify_strict(ctx.body, &signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{SignRequest, ValidSignRequest};
    use crate::domain::services::{ValidationPolicy, validate_sign_request};
    use crate::domain::value_objects::{Account, G2_COMPRESSED_LEN};
    use crate::error::StoreError;
    use ed25519_dalek::{Signer, SigningKey};

    struct OneKey(Option<[u8; 32]>);

    impl AccountKeyRepository for OneKey {
        async fn registered_key(&self, _account: &Account) -> Result<Option<[u8; 32]>, StoreError> {
            Ok(self.0)
        }
    }

    fn request() -> ValidSignRequest {
        let raw = SignRequest {
            account: "0x00000000000000000000000000000000000000aa".to_string(),
            blinded_query_phone_number: platform::crypto::to_base64(&[1u8; G2_COMPRESSED_LEN]),
            hashed_phone_number: None,
            timestamp: None,
            session_id: None,
        };
        let policy = ValidationPolicy {
            max_request_bytes: 4096,
            timestamp_window_ms: 300_000,
        };
        validate_sign_request(raw, 0, &policy, 0).unwrap()
    }

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    async fn check(registered: Option<[u8; 32]>, body: &[u8], header: Option<&str>) -> bool {
        let auth = SignedBodyAuthenticator::new(Arc::new(OneKey(registered)));
        let request = request();
        auth.authenticate(AuthContext {
            request: &request,
            body,
            authorization: header,
        })
        .await
    }

    #[tokio::test]
    async fn test_valid_signature_accepted() {
        let key = signing_key();
        let body = br#"{"account":"0xaa"}"#;
        let header = platform::crypto::to_base64(&key.sign(body).to_bytes());

        assert!(check(Some(key.verifying_key().to_bytes()), body, Some(&header)).await);
    }

    #[tokio::test]
    async fn test_signature_over_other_body_rejected() {
        let key = signing_key();
        let header = platform::crypto::to_base64(&key.sign(b"other").to_bytes());

        assert!(!check(Some(key.verifying_key().to_bytes()), b"body", Some(&header)).await);
    }

    #[tokio::test]
    async fn test_missing_header_or_key_rejected() {
        let key = signing_key();
        let header = platform::crypto::to_base64(&key.sign(b"body").to_bytes());

        assert!(!check(Some(key.verifying_key().to_bytes()), b"body", None).await);
        assert!(!check(None, b"body", Some(&header)).await);
        assert!(!check(Some(key.verifying_key().to_bytes()), b"body", Some("not base64!")).await);
    }
}
