//! Sign Query Use Case
//!
//! Issues a partial signature over a blinded phone-number query for an
//! authenticated account with quota remaining. After authentication every
//! collaborator failure except the signature engine's degrades the response
//! instead of failing it.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::SignerConfig;
use crate::domain::entities::{
    Diagnostic, QuotaStatus, RequestRecord, SignOutcome, SignRequest, UNKNOWN, ValidSignRequest,
};
use crate::domain::ports::{
    AuthContext, Authenticator, ChainHeightSource, KeyProvider, QuotaSource, SignatureEngine,
};
use crate::domain::repository::{QueryCountRepository, RequestRepository};
use crate::domain::services::validate_sign_request;
use crate::error::{SignerError, SignerResult};
use crate::metrics::{self, Stage};

/// Input DTO for a sign call
#[derive(Debug, Clone)]
pub struct SignQueryInput {
    pub request: SignRequest,
    /// Raw body as received, for signature-over-body authentication
    pub body: Vec<u8>,
    pub authorization: Option<String>,
}

/// Entry point the HTTP layer drives
#[trait_variant::make(SignQuery: Send)]
pub trait LocalSignQuery {
    async fn sign(&self, input: SignQueryInput) -> SignerResult<SignOutcome>;
}

/// Sign Query Use Case
pub struct SignQueryUseCase<A, Q, H, R, C>
where
    A: Authenticator,
    Q: QuotaSource,
    H: ChainHeightSource,
    R: RequestRepository,
    C: QueryCountRepository,
{
    authenticator: Arc<A>,
    quota_source: Arc<Q>,
    height_source: Arc<H>,
    request_repo: Arc<R>,
    count_repo: Arc<C>,
    key_provider: Arc<dyn KeyProvider>,
    engine: Arc<dyn SignatureEngine>,
    config: Arc<SignerConfig>,
}

impl<A, Q, H, R, C> SignQueryUseCase<A, Q, H, R, C>
where
    A: Authenticator + Sync,
    Q: QuotaSource + Sync,
    H: ChainHeightSource + Sync,
    R: RequestRepository + Sync,
    C: QueryCountRepository + Sync,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        authenticator: Arc<A>,
        quota_source: Arc<Q>,
        height_source: Arc<H>,
        request_repo: Arc<R>,
        count_repo: Arc<C>,
        key_provider: Arc<dyn KeyProvider>,
        engine: Arc<dyn SignatureEngine>,
        config: Arc<SignerConfig>,
    ) -> Self {
        Self {
            authenticator,
            quota_source,
            height_source,
            request_repo,
            count_repo,
            key_provider,
            engine,
            config,
        }
    }

    #[tracing::instrument(
        name = "sign",
        skip_all,
        fields(account = %input.request.account, session_id = input.request.session_id.as_deref())
    )]
    pub async fn execute(&self, input: SignQueryInput) -> SignerResult<SignOutcome> {
        if input.request.session_id.is_none() {
            metrics::inc_missing_session_id();
        }

        let request = validate_sign_request(
            input.request,
            input.body.len(),
            &self.config.validation_policy(),
            Utc::now().timestamp_millis(),
        )?;

        let authenticated = {
            let _timer = metrics::start_timer(Stage::Authentication);
            self.authenticator
                .authenticate(AuthContext {
                    request: &request,
                    body: &input.body,
                    authorization: input.authorization.as_deref(),
                })
                .await
        };
        if !authenticated {
            return Err(SignerError::Unauthenticated);
        }

        let mut diagnostics = Vec::new();

        let (mut quota, block_number) = self.read_chain_state(&request, &mut diagnostics).await;

        if let Some(quota) = quota {
            if quota.is_exceeded() {
                return Err(SignerError::QuotaExceeded {
                    quota,
                    block_number,
                });
            }
        }

        let signature = {
            let _timer = metrics::start_timer(Stage::Signature);
            let key_share = self.key_provider.key_share()?;
            self.engine.sign(&request.blinded_query, &key_share)?
        };

        let duplicate = match self.request_repo.exists(&request.fingerprint).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "Duplicate check failed, treating request as new");
                false
            }
        };

        if duplicate {
            tracing::info!(fingerprint = %request.fingerprint, "Duplicate request, count unchanged");
            metrics::inc_duplicate_requests();
            diagnostics.push(Diagnostic::DuplicateRequest);
        } else if self.persist(&request, &mut diagnostics).await {
            if let Some(quota) = quota.as_mut() {
                quota.performed_query_count += 1;
            }
        }
        let quota = quota.unwrap_or(QuotaStatus::UNKNOWN);

        tracing::info!(
            performed_query_count = quota.performed_query_count,
            total_quota = quota.total_quota,
            block_number,
            diagnostics = diagnostics.len(),
            "Partial signature issued"
        );

        Ok(SignOutcome {
            signature,
            quota,
            block_number,
            diagnostics,
        })
    }

    /// Quota and chain height, read concurrently. A failed side comes back
    /// as `None` or the sentinel; one diagnostic is recorded if either failed.
    async fn read_chain_state(
        &self,
        request: &ValidSignRequest,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (Option<QuotaStatus>, i64) {
        let _timer = metrics::start_timer(Stage::QuotaResolution);

        let (quota, block_number) = tokio::join!(
            self.quota_source
                .quota(&request.account, request.phone_hash.as_ref()),
            self.height_source.block_number(),
        );

        let mut failed = false;
        let quota = match quota {
            Ok(quota) => Some(quota),
            Err(e) => {
                tracing::warn!(error = %e, "Quota lookup failed");
                failed = true;
                None
            }
        };
        let block_number = match block_number {
            Ok(height) => height,
            Err(e) => {
                tracing::warn!(error = %e, "Chain height lookup failed");
                failed = true;
                UNKNOWN
            }
        };

        if failed {
            metrics::inc_blockchain_errors();
            diagnostics.push(Diagnostic::ContractReadFailure);
        }

        (quota, block_number)
    }

    /// Store the record and bump the count concurrently. Returns whether the
    /// increment succeeded.
    async fn persist(&self, request: &ValidSignRequest, diagnostics: &mut Vec<Diagnostic>) -> bool {
        let _timer = metrics::start_timer(Stage::Persistence);
        let record = RequestRecord::from_request(request);

        let (stored, incremented) = tokio::join!(
            self.request_repo.store(&record),
            self.count_repo.increment(&request.account),
        );

        if let Err(e) = stored {
            tracing::warn!(error = %e, fingerprint = %record.fingerprint, "Failed to store request");
            diagnostics.push(Diagnostic::FailedToStoreRequest);
        }

        match incremented {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, account = %request.account, "Failed to increment count");
                diagnostics.push(Diagnostic::FailedToIncrementCount);
                false
            }
        }
    }
}

impl<A, Q, H, R, C> SignQuery for SignQueryUseCase<A, Q, H, R, C>
where
    A: Authenticator + Send + Sync,
    Q: QuotaSource + Send + Sync,
    H: ChainHeightSource + Send + Sync,
    R: RequestRepository + Send + Sync,
    C: QueryCountRepository + Send + Sync,
{
    async fn sign(&self, input: SignQueryInput) -> SignerResult<SignOutcome> {
        self.execute(input).await
    }
}
