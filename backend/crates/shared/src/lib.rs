//! Shared Kernel - Cross-crate error vocabulary
//!
//! This crate contains the smallest shared core:
//! - [`error::kind::ErrorKind`], the status classification of terminal failures
//! - [`error::app_error::AppError`] and its result alias
//! - Its axum `IntoResponse` rendering (feature `axum`)
//!
//! Domain crates define their own `thiserror` enums and convert into
//! [`error::app_error::AppError`] at the boundary.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
