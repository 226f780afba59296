//! Application Configuration
//!
//! Configuration for the signer application layer.

use std::time::Duration;

use crate::domain::services::ValidationPolicy;

/// Signer application configuration
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Serialized sign request must be below this many bytes
    pub max_request_bytes: usize,
    /// Accepted clock skew for `timestamp`, either direction
    pub timestamp_window: Duration,
    /// How long request records are kept for deduplication
    pub request_retention: Duration,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: 4096,
            timestamp_window: Duration::from_secs(300),
            request_retention: Duration::from_secs(30 * 24 * 3600),
        }
    }
}

impl SignerConfig {
    /// Config for development (wider clock-skew window)
    pub fn development() -> Self {
        Self {
            timestamp_window: Duration::from_secs(3600),
            ..Self::default()
        }
    }

    pub fn timestamp_window_ms(&self) -> i64 {
        self.timestamp_window.as_millis() as i64
    }

    /// Transport body limit; oversized bodies never reach the validator
    pub fn body_limit_bytes(&self) -> usize {
        self.max_request_bytes.saturating_mul(4)
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            max_request_bytes: self.max_request_bytes,
            timestamp_window_ms: self.timestamp_window_ms(),
        }
    }
}
