//! The credit ledger collaborator contract.

use crate::error::Result;
use async_trait::async_trait;

/// Read access to the user's credit balance.
///
/// Debits happen on the ledger's side when a generation succeeds; the core
/// only re-reads the balance to refresh what it displays.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    async fn get_balance(&self) -> Result<u64>;
}
