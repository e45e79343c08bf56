use async_trait::async_trait;
use nftrader_core::Price;

use crate::error::PortResult;

/// Port for per-user wallet rows
///
/// Pure storage: balance rules (positive amounts, no overdraft) live with
/// the caller.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Current balance, or `None` if the user has no wallet yet
    async fn fetch_balance(&self, user_id: &str) -> PortResult<Option<Price>>;

    /// Create a wallet; `PortError::Conflict` if one already exists
    async fn insert_wallet(&self, user_id: &str, balance: Price) -> PortResult<Price>;

    /// Overwrite the balance and return the stored value
    async fn update_balance(&self, user_id: &str, balance: Price) -> PortResult<Price>;
}
