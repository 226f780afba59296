//! Environment configuration
//!
//! Every setting has a default except the database and chain endpoints.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use signer::{QuotaPolicy, SignerConfig};

/// Process-level settings read once at startup
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub chain_rpc_url: String,
    pub chain_rpc_timeout: Duration,
    pub key_share_hex: Option<String>,
    pub bind_addr: SocketAddr,
    pub signer: SignerConfig,
    pub quota: QuotaPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{name} must be set in environment"))
        };

        let base = if cfg!(debug_assertions) {
            SignerConfig::development()
        } else {
            SignerConfig::default()
        };
        let quota_defaults = QuotaPolicy::default();

        let signer = SignerConfig {
            max_request_bytes: parse_or(&lookup, "SIGNER_MAX_REQUEST_BYTES", base.max_request_bytes)?,
            timestamp_window: Duration::from_secs(parse_or(
                &lookup,
                "SIGNER_TIMESTAMP_WINDOW_SECS",
                base.timestamp_window.as_secs(),
            )?),
            request_retention: Duration::from_secs(
                parse_or(
                    &lookup,
                    "SIGNER_REQUEST_RETENTION_DAYS",
                    base.request_retention.as_secs() / 86_400,
                )? * 86_400,
            ),
        };
        if signer.max_request_bytes == 0 {
            bail!("SIGNER_MAX_REQUEST_BYTES must be positive");
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            chain_rpc_url: required("CHAIN_RPC_URL")?,
            chain_rpc_timeout: Duration::from_millis(parse_or(&lookup, "CHAIN_RPC_TIMEOUT_MS", 5_000)?),
            key_share_hex: lookup("SIGNER_KEY_SHARE").filter(|v| !v.trim().is_empty()),
            bind_addr: parse_or(
                &lookup,
                "SIGNER_BIND_ADDR",
                SocketAddr::from(([0, 0, 0, 0], 31113)),
            )?,
            signer,
            quota: QuotaPolicy {
                base_quota: parse_or(&lookup, "QUOTA_BASE", quota_defaults.base_quota)?,
                queries_per_transaction: parse_or(
                    &lookup,
                    "QUOTA_PER_TRANSACTION",
                    quota_defaults.queries_per_transaction,
                )?,
                min_balance_wei: parse_or(
                    &lookup,
                    "QUOTA_MIN_BALANCE_WEI",
                    quota_defaults.min_balance_wei,
                )?,
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name}={raw:?} is invalid: {e}")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/signer"),
        ("CHAIN_RPC_URL", "http://localhost:8545"),
    ];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.chain_rpc_timeout, Duration::from_millis(5_000));
        assert_eq!(config.bind_addr.port(), 31113);
        assert_eq!(config.signer.max_request_bytes, 4096);
        assert_eq!(config.signer.request_retention, Duration::from_secs(30 * 86_400));
        assert_eq!(config.quota, QuotaPolicy::default());
        assert!(config.key_share_hex.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("SIGNER_TIMESTAMP_WINDOW_SECS", "60"),
            ("QUOTA_BASE", "3"),
            ("QUOTA_MIN_BALANCE_WEI", "1000000000000000000"),
            ("SIGNER_BIND_ADDR", "127.0.0.1:9000"),
        ]);
        let config = AppConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.signer.timestamp_window, Duration::from_secs(60));
        assert_eq!(config.quota.base_quota, 3);
        assert_eq!(config.quota.min_balance_wei, 1_000_000_000_000_000_000);
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn test_missing_required() {
        let Err(err) = AppConfig::from_lookup(lookup(&REQUIRED[..1])) else {
            panic!("config without CHAIN_RPC_URL must be rejected");
        };
        assert!(err.to_string().contains("CHAIN_RPC_URL"));
    }

    #[test]
    fn test_invalid_number() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DATABASE_MAX_CONNECTIONS", "many"));
        let Err(err) = AppConfig::from_lookup(lookup(&vars)) else {
            panic!("non-numeric DATABASE_MAX_CONNECTIONS must be rejected");
        };
        assert!(format!("{err:#}").contains("DATABASE_MAX_CONNECTIONS"));
    }
}
