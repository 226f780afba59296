//! Infrastructure Layer
//!
//! Concrete collaborators: PostgreSQL ledger, JSON-RPC chain reader,
//! BLS signing, key loading and request authentication.

pub mod auth;
pub mod bls;
pub mod chain;
pub mod keys;
pub mod postgres;
pub mod quota;
