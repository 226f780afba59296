//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Hashing and encoding utilities (SHA-256, Base64, hex)
//! - Client request helpers (client IP, `Authorization` header)
//! - JSON-RPC 2.0 client used for chain reads

pub mod client;
pub mod crypto;
pub mod rpc;
