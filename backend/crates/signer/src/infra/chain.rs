//! Chain State Reader
//!
//! Reads block height and account state from an Ethereum-compatible node
//! over JSON-RPC, and derives the on-chain query allowance from it.

use std::time::Duration;

use platform::rpc::{JsonRpcClient, parse_quantity};
use serde_json::json;

use crate::domain::ports::ChainHeightSource;
use crate::domain::value_objects::Account;
use crate::error::ChainError;

/// On-chain allowance rule.
///
/// Accounts holding at least `min_balance_wei` get `base_quota` plus
/// `queries_per_transaction` for every transaction they have sent; poorer
/// accounts get nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    pub base_quota: i64,
    pub queries_per_transaction: i64,
    pub min_balance_wei: u128,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            base_quota: 10,
            queries_per_transaction: 10,
            min_balance_wei: 0,
        }
    }
}

impl QuotaPolicy {
    pub fn total_quota(&self, transaction_count: u64, balance_wei: u128) -> i64 {
        if balance_wei < self.min_balance_wei {
            return 0;
        }
        let per_tx = i64::try_from(transaction_count)
            .unwrap_or(i64::MAX)
            .saturating_mul(self.queries_per_transaction);
        self.base_quota.saturating_add(per_tx)
    }
}

/// Source of the on-chain half of a quota
#[trait_variant::make(AllowanceSource: Send)]
pub trait LocalAllowanceSource {
    /// Total quota the chain grants `account`
    async fn total_quota(&self, account: &Account) -> Result<i64, ChainError>;
}

/// JSON-RPC chain client
#[derive(Debug)]
pub struct RpcChainClient {
    rpc: JsonRpcClient,
    policy: QuotaPolicy,
}

impl RpcChainClient {
    pub fn new(url: impl Into<String>, timeout: Duration, policy: QuotaPolicy) -> Result<Self, ChainError> {
        Ok(Self {
            rpc: JsonRpcClient::new(url, timeout)?,
            policy,
        })
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    async fn quantity(&self, method: &str, params: serde_json::Value) -> Result<u128, ChainError> {
        let raw: String = self.rpc.call(method, params).await?;
        Ok(parse_quantity(&raw)?)
    }

    pub async fn transaction_count(&self, account: &Account) -> Result<u64, ChainError> {
        let count = self
            .quantity("eth_getTransactionCount", json!([account.as_str(), "latest"]))
            .await?;
        u64::try_from(count).map_err(|_| ChainError::OutOfRange(format!("transaction count {count}")))
    }

    pub async fn balance(&self, account: &Account) -> Result<u128, ChainError> {
        self.quantity("eth_getBalance", json!([account.as_str(), "latest"]))
            .await
    }
}

impl ChainHeightSource for RpcChainClient {
    async fn block_number(&self) -> Result<i64, ChainError> {
        let height = self.quantity("eth_blockNumber", json!([])).await?;
        i64::try_from(height).map_err(|_| ChainError::OutOfRange(format!("block number {height}")))
    }
}

impl AllowanceSource for RpcChainClient {
    async fn total_quota(&self, account: &Account) -> Result<i64, ChainError> {
        let (transaction_count, balance) =
            tokio::try_join!(self.transaction_count(account), self.balance(account))?;

        let total = self.policy.total_quota(transaction_count, balance);
        tracing::debug!(
            account = %account,
            transaction_count,
            total_quota = total,
            "Resolved on-chain allowance"
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_grants_base_plus_per_transaction() {
        let policy = QuotaPolicy {
            base_quota: 5,
            queries_per_transaction: 3,
            min_balance_wei: 100,
        };
        assert_eq!(policy.total_quota(0, 100), 5);
        assert_eq!(policy.total_quota(4, 1_000), 17);
    }

    #[test]
    fn test_policy_below_min_balance_is_zero() {
        let policy = QuotaPolicy {
            base_quota: 5,
            queries_per_transaction: 3,
            min_balance_wei: 100,
        };
        assert_eq!(policy.total_quota(50, 99), 0);
    }

    #[test]
    fn test_policy_saturates() {
        let policy = QuotaPolicy::default();
        assert_eq!(policy.total_quota(u64::MAX, 1), i64::MAX);
    }

    #[test]
    fn test_client_construction() {
        let client = RpcChainClient::new(
            "http://localhost:8545",
            Duration::from_millis(500),
            QuotaPolicy::default(),
        )
        .unwrap();
        assert_eq!(client.policy(), &QuotaPolicy::default());
    }
}
