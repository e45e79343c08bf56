use async_trait::async_trait;
use nftrader_core::{Price, Purchase, PurchaseId, Timestamp};

use crate::error::PortResult;

/// Port for ownership records
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    /// Persist a new purchase
    async fn insert(&self, purchase: Purchase) -> PortResult<Purchase>;

    /// Load a purchase by id
    async fn get(&self, id: PurchaseId) -> PortResult<Option<Purchase>>;

    /// All purchases of a user, newest first
    async fn list_for_user(&self, user_id: &str) -> PortResult<Vec<Purchase>>;

    /// The user's unsold purchase of an asset, if any
    async fn find_unsold(&self, user_id: &str, asset_id: &str) -> PortResult<Option<Purchase>>;

    /// Record a sale and return the updated purchase
    async fn mark_sold(&self, id: PurchaseId, price: Price, at: Timestamp)
    -> PortResult<Purchase>;
}
