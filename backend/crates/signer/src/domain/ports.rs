//! Collaborator Ports
//!
//! External collaborators the sign use case orchestrates. Async ports may
//! fail independently; the use case decides what each failure means.

use crate::domain::entities::{QuotaStatus, ValidSignRequest};
use crate::domain::value_objects::{
    Account, BlindedQuery, KeyShare, PartialSignature, PhoneHash,
};
use crate::error::{ChainError, KeyProviderError, QuotaError, SignatureEngineError};

/// What the authenticator gets to look at
#[derive(Debug, Clone, Copy)]
pub struct AuthContext<'a> {
    pub request: &'a ValidSignRequest,
    /// Raw body bytes as received
    pub body: &'a [u8],
    /// `Authorization` header value
    pub authorization: Option<&'a str>,
}

/// Proves the caller controls the claimed account
#[trait_variant::make(Authenticator: Send)]
pub trait LocalAuthenticator {
    /// Any internal failure counts as "not authenticated"
    async fn authenticate(&self, ctx: AuthContext<'_>) -> bool;
}

/// Performed count and allowance for an account
#[trait_variant::make(QuotaSource: Send)]
pub trait LocalQuotaSource {
    async fn quota(
        &self,
        account: &Account,
        phone_hash: Option<&PhoneHash>,
    ) -> Result<QuotaStatus, QuotaError>;
}

/// Current chain height
#[trait_variant::make(ChainHeightSource: Send)]
pub trait LocalChainHeightSource {
    async fn block_number(&self) -> Result<i64, ChainError>;
}

/// Source of the signer's secret-key share
pub trait KeyProvider: Send + Sync {
    fn key_share(&self) -> Result<KeyShare, KeyProviderError>;
}

/// Deterministic partial signature over a blinded value
pub trait SignatureEngine: Send + Sync {
    fn sign(
        &self,
        blinded_query: &BlindedQuery,
        key_share: &KeyShare,
    ) -> Result<PartialSignature, SignatureEngineError>;
}
