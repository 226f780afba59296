//! Partial-signature Signer
//!
//! Issues BLS partial signatures over blinded phone-number queries for
//! authenticated accounts, metered by an on-chain quota.
//!
//! Clean Architecture structure:
//! - `domain/` - Request model, validation, collaborator ports
//! - `application/` - Sign use case and configuration
//! - `infra/` - PostgreSQL ledger, JSON-RPC chain reader, BLS, auth
//! - `presentation/` - HTTP handlers
//!
//! ## Failure Model
//! - Validation, authentication and the quota gate reject the call outright
//! - Chain reads, dedup reads and ledger writes only degrade the response
//! - A signature engine failure is a 500
//! - The quota gate and the increment are not serialized; two concurrent
//!   calls for one account can both pass the gate

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod metrics;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SignerConfig;
pub use error::{SignerError, SignerResult, VERSION};
pub use infra::chain::{QuotaPolicy, RpcChainClient};
pub use infra::keys::StaticKeyProvider;
pub use infra::postgres::PgSignerRepository;
pub use presentation::router::{metrics_router, signer_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
