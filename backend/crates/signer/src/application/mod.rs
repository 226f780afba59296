//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and collaborators.

pub mod config;
pub mod sign_query;

pub use config::SignerConfig;
pub use sign_query::{SignQuery, SignQueryInput, SignQueryUseCase};
