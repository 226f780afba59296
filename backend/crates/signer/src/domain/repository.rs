//! Repository Traits
//!
//! Interfaces for the request ledger. Implementation is in the infra layer.
//! The ledger owns serialization of the shared counters; callers never hold
//! locks across these calls.

use crate::domain::entities::RequestRecord;
use crate::domain::value_objects::{Account, RequestFingerprint};
use crate::error::StoreError;

/// Fingerprint-keyed request records
#[trait_variant::make(RequestRepository: Send)]
pub trait LocalRequestRepository {
    /// Whether a record with this fingerprint was already stored
    async fn exists(&self, fingerprint: &RequestFingerprint) -> Result<bool, StoreError>;

    /// Store a record; storing an existing fingerprint again is a no-op
    async fn store(&self, record: &RequestRecord) -> Result<(), StoreError>;
}

/// Per-account performed query counter
#[trait_variant::make(QueryCountRepository: Send)]
pub trait LocalQueryCountRepository {
    /// Current performed count (0 for an unseen account)
    async fn performed_query_count(&self, account: &Account) -> Result<i64, StoreError>;

    /// Atomically add one to the account's count
    async fn increment(&self, account: &Account) -> Result<(), StoreError>;
}

/// Registered request-signing keys
#[trait_variant::make(AccountKeyRepository: Send)]
pub trait LocalAccountKeyRepository {
    /// Ed25519 verifying key registered for the account, if any
    async fn registered_key(&self, account: &Account) -> Result<Option<[u8; 32]>, StoreError>;
}
