//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use platform::client::ClientContext;

use crate::application::config::SignerConfig;
use crate::application::sign_query::{SignQuery, SignQueryInput};
use crate::error::{SignerError, SignerResult, ValidationError};
use crate::metrics;
use crate::presentation::dto::{SignRequestBody, SignResponseBody, StatusResponse};

/// Shared state for signer handlers
pub struct SignerAppState<U>
where
    U: SignQuery + Send + Sync + 'static,
{
    pub use_case: Arc<U>,
    pub config: Arc<SignerConfig>,
}

impl<U> Clone for SignerAppState<U>
where
    U: SignQuery + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            use_case: self.use_case.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /api/signer/sign
///
/// The body is taken raw: authentication is over the exact bytes received,
/// and malformed JSON must map to the standard "invalid input" envelope.
/// Every request is counted here, including ones rejected before parsing.
pub async fn sign<U>(
    State(state): State<SignerAppState<U>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> SignerResult<Json<SignResponseBody>>
where
    U: SignQuery + Send + Sync + 'static,
{
    metrics::inc_requests();

    let body = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Sign request body rejected");
        SignerError::InvalidInput(body_rejection(
            rejection.status(),
            content_length(&headers),
            state.config.body_limit_bytes(),
        ))
    })?;

    let request: SignRequestBody = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Malformed sign request body");
        SignerError::InvalidInput(ValidationError::MalformedBody)
    })?;

    let client = ClientContext::from_headers(&headers, None);
    tracing::debug!(
        client_ip = client.ip_string(),
        user_agent = client.user_agent.as_deref(),
        "Sign request received"
    );

    let input = SignQueryInput {
        request: request.into(),
        body: body.to_vec(),
        authorization: client.authorization,
    };

    let outcome = state.use_case.sign(input).await?;
    metrics::record_response(StatusCode::OK);

    Ok(Json(outcome.into()))
}

/// Only a length-limit rejection is reported as oversized
pub(crate) fn body_rejection(
    status: StatusCode,
    content_length: Option<usize>,
    limit: usize,
) -> ValidationError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::TooLarge {
            max: limit,
            actual: content_length.unwrap_or(0),
        }
    } else {
        ValidationError::MalformedBody
    }
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// GET /api/signer/status
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// GET /metrics
pub async fn metrics_text() -> impl IntoResponse {
    match metrics::render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                String::new(),
            )
        }
    }
}
