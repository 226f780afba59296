//! Domain Entities
//!
//! The sign request as submitted, its validated view, quota state, and the
//! outcome of a processed call.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{
    Account, BlindedQuery, PartialSignature, PhoneHash, RequestFingerprint,
};

/// Sentinel reported for any count or height that could not be read
pub const UNKNOWN: i64 = -1;

/// Sign request exactly as submitted.
///
/// Field order is the canonical encoding order used for fingerprinting and
/// for the serialized size check; absent optionals encode as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignRequest {
    pub account: String,
    pub blinded_query_phone_number: String,
    pub hashed_phone_number: Option<String>,
    pub timestamp: Option<i64>,
    pub session_id: Option<String>,
}

impl SignRequest {
    /// Canonical encoding (compact JSON, fixed field order)
    pub fn canonical_bytes(&self) -> Vec<u8> {
        // Strings, integers and options only: serialization cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn fingerprint(&self) -> RequestFingerprint {
        RequestFingerprint::from_canonical_bytes(&self.canonical_bytes())
    }
}

/// A request that passed validation, with typed handles
#[derive(Debug, Clone)]
pub struct ValidSignRequest {
    pub account: Account,
    pub blinded_query: BlindedQuery,
    pub phone_hash: Option<PhoneHash>,
    pub fingerprint: RequestFingerprint,
    pub raw: SignRequest,
}

/// Persisted request record, keyed by fingerprint
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub fingerprint: RequestFingerprint,
    pub account: Account,
    pub blinded_query: String,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RequestRecord {
    pub fn from_request(request: &ValidSignRequest) -> Self {
        Self {
            fingerprint: request.fingerprint.clone(),
            account: request.account.clone(),
            blinded_query: request.blinded_query.as_str().to_string(),
            session_id: request.raw.session_id.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Performed query count and total allowance for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub performed_query_count: i64,
    pub total_quota: i64,
}

impl QuotaStatus {
    pub const UNKNOWN: QuotaStatus = QuotaStatus {
        performed_query_count: UNKNOWN,
        total_quota: UNKNOWN,
    };

    pub fn new(performed_query_count: i64, total_quota: i64) -> Self {
        Self {
            performed_query_count,
            total_quota,
        }
    }

    /// Equality counts as exceeded: a quota of N permits exactly N uses.
    pub fn is_exceeded(&self) -> bool {
        self.performed_query_count >= self.total_quota
    }
}

/// Non-fatal degradation collected during a call.
///
/// Variants are declared in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    ContractReadFailure,
    DuplicateRequest,
    FailedToStoreRequest,
    FailedToIncrementCount,
}

impl Diagnostic {
    pub const SEPARATOR: &'static str = ", ";

    pub const fn tag(&self) -> &'static str {
        match self {
            Diagnostic::ContractReadFailure => "contract read failure",
            Diagnostic::DuplicateRequest => "duplicate request",
            Diagnostic::FailedToStoreRequest => "failed to store request",
            Diagnostic::FailedToIncrementCount => "failed to increment count",
        }
    }

    /// Join tags in collection order; `None` when nothing was collected
    pub fn join(diagnostics: &[Diagnostic]) -> Option<String> {
        if diagnostics.is_empty() {
            return None;
        }
        Some(
            diagnostics
                .iter()
                .map(Diagnostic::tag)
                .collect::<Vec<_>>()
                .join(Self::SEPARATOR),
        )
    }
}

/// Outcome of a call that reached the signature step
#[derive(Debug, Clone)]
pub struct SignOutcome {
    pub signature: PartialSignature,
    pub quota: QuotaStatus,
    pub block_number: i64,
    pub diagnostics: Vec<Diagnostic>,
}

impl SignOutcome {
    pub fn success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error(&self) -> Option<String> {
        Diagnostic::join(&self.diagnostics)
    }
}
