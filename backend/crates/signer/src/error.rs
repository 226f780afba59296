//! Signer Error Types
//!
//! Terminal outcomes of a sign call ([`SignerError`]) and the error types of
//! the collaborators the use case orchestrates. Collaborator errors other
//! than the signature engine's never reach the caller directly; the use case
//! converts them into sentinels or diagnostics.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::entities::QuotaStatus;
use crate::metrics;

/// Signer-specific result type alias
pub type SignerResult<T> = Result<T, SignerError>;

/// Service version reported in every response envelope
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Terminal outcomes: the call is rejected and nothing further is attempted.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Request failed validation (400)
    #[error("invalid input")]
    InvalidInput(#[from] ValidationError),

    /// Caller could not prove control of the account (401)
    #[error("unauthenticated user")]
    Unauthenticated,

    /// Quota lookup succeeded and the account has no queries left (403)
    #[error("exceeded quota")]
    QuotaExceeded {
        quota: QuotaStatus,
        block_number: i64,
    },

    /// Key material could not be loaded (500)
    #[error("unexpected error")]
    KeyUnavailable(#[from] KeyProviderError),

    /// Signature engine failed; a defect, never transient (500)
    #[error("unexpected error")]
    Signature(#[from] SignatureEngineError),
}

impl SignerError {
    /// Fixed wire tag for this outcome
    pub fn tag(&self) -> &'static str {
        match self {
            SignerError::InvalidInput(_) => "invalid input",
            SignerError::Unauthenticated => "unauthenticated user",
            SignerError::QuotaExceeded { .. } => "exceeded quota",
            SignerError::KeyUnavailable(_) | SignerError::Signature(_) => "unexpected error",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SignerError::InvalidInput(_) => ErrorKind::BadRequest,
            SignerError::Unauthenticated => ErrorKind::Unauthorized,
            SignerError::QuotaExceeded { .. } => ErrorKind::Forbidden,
            SignerError::KeyUnavailable(_) | SignerError::Signature(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn log(&self) {
        match self {
            SignerError::InvalidInput(reason) => {
                tracing::debug!(reason = %reason, "Rejected invalid sign request");
            }
            SignerError::Unauthenticated => {
                tracing::warn!("Rejected unauthenticated sign request");
            }
            SignerError::QuotaExceeded {
                quota,
                block_number,
            } => {
                tracing::warn!(
                    performed_query_count = quota.performed_query_count,
                    total_quota = quota.total_quota,
                    block_number,
                    "Quota exceeded"
                );
            }
            SignerError::KeyUnavailable(e) => {
                tracing::error!(error = %e, "Key share unavailable");
            }
            SignerError::Signature(e) => {
                tracing::error!(error = %e, "Partial signature generation failed");
            }
        }
    }
}

impl From<&SignerError> for AppError {
    fn from(err: &SignerError) -> Self {
        let app_err = AppError::new(err.kind(), err.tag()).with_detail("version", VERSION);
        match err {
            SignerError::QuotaExceeded {
                quota,
                block_number,
            } => app_err
                .with_detail("performedQueryCount", quota.performed_query_count)
                .with_detail("totalQuota", quota.total_quota)
                .with_detail("blockNumber", *block_number),
            _ => app_err,
        }
    }
}

impl IntoResponse for SignerError {
    fn into_response(self) -> Response {
        self.log();
        metrics::record_response(self.status_code());
        AppError::from(&self).into_response()
    }
}

// ============================================================================
// Collaborator errors
// ============================================================================

/// Reasons a request fails input validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("account is not a valid address")]
    InvalidAccount,

    #[error("blinded query is not a valid encoding")]
    InvalidBlindedQuery,

    #[error("hashed phone number is not a valid hash")]
    InvalidPhoneHash,

    #[error("request is {actual} bytes, limit is {max}")]
    TooLarge { max: usize, actual: usize },

    #[error("timestamp outside accepted window")]
    StaleTimestamp,

    #[error("malformed request body")]
    MalformedBody,
}

/// Persistence failure in the request ledger
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Chain read failure
#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Rpc(#[from] platform::rpc::RpcError),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// Quota lookup failure: either side of the lookup may fail
#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("Chain read failed: {0}")]
    Chain(#[from] ChainError),

    #[error("Ledger read failed: {0}")]
    Ledger(#[from] StoreError),
}

/// Signature engine failure
#[derive(Debug, Error)]
pub enum SignatureEngineError {
    #[error("blinded query is not a valid curve point")]
    InvalidPoint,

    #[error("key share is not a valid scalar")]
    InvalidKeyShare,

    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Key provider failure
#[derive(Debug, Error)]
pub enum KeyProviderError {
    #[error("Key share is not configured")]
    Missing,

    #[error("Key share is malformed: {0}")]
    Malformed(String),
}
