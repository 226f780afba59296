//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! signer crate through `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use anyhow::{Context, bail};
use axum::Router;
use signer::application::sign_query::SignQueryUseCase;
use signer::infra::auth::SignedBodyAuthenticator;
use signer::infra::bls::BlsSignatureEngine;
use signer::infra::quota::LedgerQuotaSource;
use signer::{
    PgSignerRepository, RpcChainClient, StaticKeyProvider, metrics_router, signer_router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,signer=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    signer::metrics::init().context("failed to register metrics")?;

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = Arc::new(PgSignerRepository::new(pool.clone()));

    // Startup cleanup: drop request records past retention
    // Errors here should not prevent server startup
    if let Err(e) = repo.prune_requests(config.signer.request_retention).await {
        tracing::warn!(error = %e, "Request pruning failed, continuing anyway");
    }

    // Key share
    let key_provider = match config.key_share_hex.as_deref() {
        Some(hex) => StaticKeyProvider::from_hex(hex).context("SIGNER_KEY_SHARE is invalid")?,
        None if cfg!(debug_assertions) => {
            tracing::warn!("SIGNER_KEY_SHARE not set, using a random development key share");
            StaticKeyProvider::random()
        }
        None => bail!("SIGNER_KEY_SHARE must be set in production"),
    };

    let chain = Arc::new(RpcChainClient::new(
        config.chain_rpc_url.clone(),
        config.chain_rpc_timeout,
        config.quota,
    )?);
    tracing::info!(
        rpc_url = %config.chain_rpc_url,
        base_quota = config.quota.base_quota,
        queries_per_transaction = config.quota.queries_per_transaction,
        "Chain client configured"
    );

    let use_case = SignQueryUseCase::new(
        Arc::new(SignedBodyAuthenticator::new(repo.clone())),
        Arc::new(LedgerQuotaSource::new(repo.clone(), chain.clone())),
        chain,
        repo.clone(),
        repo,
        Arc::new(key_provider),
        Arc::new(BlsSignatureEngine::new()),
        Arc::new(config.signer.clone()),
    );

    // Build router
    let app = Router::new()
        .nest("/api/signer", signer_router(use_case, config.signer))
        .merge(metrics_router())
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
