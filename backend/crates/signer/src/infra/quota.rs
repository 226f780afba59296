//! Ledger-backed Quota Source
//!
//! Performed count comes from the request ledger, the allowance from chain
//! state. Both reads are issued together; either failing fails the lookup.

use std::sync::Arc;

use crate::domain::entities::QuotaStatus;
use crate::domain::ports::QuotaSource;
use crate::domain::repository::QueryCountRepository;
use crate::domain::value_objects::{Account, PhoneHash};
use crate::error::QuotaError;
use crate::infra::chain::AllowanceSource;

pub struct LedgerQuotaSource<L, C>
where
    L: QueryCountRepository,
    C: AllowanceSource,
{
    ledger: Arc<L>,
    chain: Arc<C>,
}

impl<L, C> LedgerQuotaSource<L, C>
where
    L: QueryCountRepository + Sync,
    C: AllowanceSource + Sync,
{
    pub fn new(ledger: Arc<L>, chain: Arc<C>) -> Self {
        Self { ledger, chain }
    }
}

impl<L, C> QuotaSource for LedgerQuotaSource<L, C>
where
    L: QueryCountRepository + Send + Sync,
    C: AllowanceSource + Send + Sync,
{
    async fn quota(
        &self,
        account: &Account,
        // Allowance is per account; the phone hash does not change it.
        _phone_hash: Option<&PhoneHash>,
    ) -> Result<QuotaStatus, QuotaError> {
        let (performed, total) = tokio::try_join!(
            async { Ok::<_, QuotaError>(self.ledger.performed_query_count(account).await?) },
            async { Ok::<_, QuotaError>(self.chain.total_quota(account).await?) },
        )?;

        Ok(QuotaStatus::new(performed, total))
    }
}
