//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (SignRequest, QuotaStatus, Diagnostic, SignOutcome)
//! - Domain value objects (Account, BlindedQuery, RequestFingerprint, ...)
//! - Domain services (request validation)
//! - Repository traits and collaborator ports (interfaces)

pub mod entities;
pub mod ports;
pub mod repository;
pub mod services;
pub mod value_objects;
