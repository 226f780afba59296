//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entities::{SignOutcome, SignRequest};
use crate::error::VERSION;

/// Request for POST /api/signer/sign
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequestBody {
    pub account: String,
    pub blinded_query_phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "sessionID", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl From<SignRequestBody> for SignRequest {
    fn from(body: SignRequestBody) -> Self {
        Self {
            account: body.account,
            blinded_query_phone_number: body.blinded_query_phone_number,
            hashed_phone_number: body.hashed_phone_number,
            timestamp: body.timestamp,
            session_id: body.session_id,
        }
    }
}

/// Response for POST /api/signer/sign (HTTP 200)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponseBody {
    pub success: bool,
    pub signature: String,
    pub version: String,
    pub performed_query_count: i64,
    pub total_quota: i64,
    pub block_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SignOutcome> for SignResponseBody {
    fn from(outcome: SignOutcome) -> Self {
        Self {
            success: outcome.success(),
            error: outcome.error(),
            version: VERSION.to_string(),
            performed_query_count: outcome.quota.performed_query_count,
            total_quota: outcome.quota.total_quota,
            block_number: outcome.block_number,
            signature: outcome.signature.into_string(),
        }
    }
}

/// Response for GET /api/signer/status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: VERSION,
        }
    }
}
