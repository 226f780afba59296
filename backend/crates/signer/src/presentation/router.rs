//! Signer Router

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::application::config::SignerConfig;
use crate::application::sign_query::{SignQuery, SignQueryUseCase};
use crate::infra::auth::SignedBodyAuthenticator;
use crate::infra::chain::RpcChainClient;
use crate::infra::postgres::PgSignerRepository;
use crate::infra::quota::LedgerQuotaSource;
use crate::presentation::handlers::{self, SignerAppState};

/// Use case wired to PostgreSQL and a JSON-RPC node
pub type PgSignQueryUseCase = SignQueryUseCase<
    SignedBodyAuthenticator<PgSignerRepository>,
    LedgerQuotaSource<PgSignerRepository, RpcChainClient>,
    RpcChainClient,
    PgSignerRepository,
    PgSignerRepository,
>;

/// Create the signer router for the PostgreSQL/JSON-RPC composition
pub fn signer_router(use_case: PgSignQueryUseCase, config: SignerConfig) -> Router {
    signer_router_generic(use_case, config)
}

/// Create a signer router for any use case implementation
pub fn signer_router_generic<U>(use_case: U, config: SignerConfig) -> Router
where
    U: SignQuery + Send + Sync + 'static,
{
    let body_limit = config.body_limit_bytes();
    let state = SignerAppState {
        use_case: Arc::new(use_case),
        config: Arc::new(config),
    };

    Router::new()
        .route("/sign", post(handlers::sign::<U>))
        .route("/status", get(handlers::status))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Prometheus scrape endpoint, mounted at the application root
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(handlers::metrics_text))
}
