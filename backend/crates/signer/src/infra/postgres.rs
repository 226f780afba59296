//! PostgreSQL Repository Implementations

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;

use crate::domain::entities::RequestRecord;
use crate::domain::repository::{AccountKeyRepository, QueryCountRepository, RequestRepository};
use crate::domain::value_objects::{Account, RequestFingerprint};
use crate::error::StoreError;

/// PostgreSQL-backed request ledger
#[derive(Clone)]
pub struct PgSignerRepository {
    pool: PgPool,
}

impl PgSignerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete request records older than `retention`.
    ///
    /// Counters are never pruned; they only grow.
    pub async fn prune_requests(&self, retention: Duration) -> Result<u64, StoreError> {
        let retention = chrono::Duration::from_std(retention)
            .unwrap_or_else(|_| chrono::Duration::days(30));
        let cutoff = Utc::now() - retention;

        let deleted = sqlx::query("DELETE FROM signer_requests WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(deleted, cutoff = %cutoff, "Pruned old sign requests");

        Ok(deleted)
    }
}

impl RequestRepository for PgSignerRepository {
    async fn exists(&self, fingerprint: &RequestFingerprint) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM signer_requests WHERE fingerprint = $1)",
        )
        .bind(fingerprint.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn store(&self, record: &RequestRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO signer_requests (
                fingerprint,
                account,
                blinded_query,
                session_id,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (fingerprint) DO NOTHING
            "#,
        )
        .bind(record.fingerprint.as_str())
        .bind(record.account.as_str())
        .bind(&record.blinded_query)
        .bind(record.session_id.as_deref())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(fingerprint = %record.fingerprint, "Sign request stored");

        Ok(())
    }
}

impl QueryCountRepository for PgSignerRepository {
    async fn performed_query_count(&self, account: &Account) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT performed_query_count FROM signer_query_counts WHERE account = $1",
        )
        .bind(account.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    async fn increment(&self, account: &Account) -> Result<(), StoreError> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO signer_query_counts (account, performed_query_count, updated_at)
            VALUES ($1, 1, NOW())
            ON CONFLICT (account)
            DO UPDATE SET
                performed_query_count = signer_query_counts.performed_query_count + 1,
                updated_at = NOW()
            RETURNING performed_query_count
            "#,
        )
        .bind(account.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(account = %account, performed_query_count = row.0, "Query count incremented");

        Ok(())
    }
}

impl AccountKeyRepository for PgSignerRepository {
    async fn registered_key(&self, account: &Account) -> Result<Option<[u8; 32]>, StoreError> {
        let row = sqlx::query_as::<_, AccountKeyRow>(
            "SELECT account, public_key FROM signer_account_keys WHERE account = $1",
        )
        .bind(account.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(AccountKeyRow::into_key))
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct AccountKeyRow {
    account: String,
    public_key: Vec<u8>,
}

impl AccountKeyRow {
    fn into_key(self) -> Option<[u8; 32]> {
        match <[u8; 32]>::try_from(self.public_key.as_slice()) {
            Ok(key) => Some(key),
            Err(_) => {
                tracing::warn!(
                    account = %self.account,
                    len = self.public_key.len(),
                    "Registered key has wrong length, ignoring"
                );
                None
            }
        }
    }
}
