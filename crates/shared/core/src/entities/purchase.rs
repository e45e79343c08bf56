use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{AssetId, Price, Timestamp, UserId};

/// Unique identifier for a purchase record
pub type PurchaseId = Uuid;

/// Ownership record written when a user buys an asset
///
/// A purchase stays "unsold" until `sold_at` is set; a user owns an asset
/// while they hold an unsold purchase of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub asset_id: AssetId,
    /// Price paid
    pub price: Price,
    /// Catalog base price at the time of purchase (trend reference)
    pub base_price_at_purchase: Price,
    pub created_at: Timestamp,
    pub sold_at: Option<Timestamp>,
    pub sold_price: Option<Price>,
}

impl Purchase {
    /// Create a new unsold purchase
    pub fn new(
        user_id: impl Into<UserId>,
        asset_id: impl Into<AssetId>,
        price: Price,
        base_price_at_purchase: Price,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            asset_id: asset_id.into(),
            price,
            base_price_at_purchase,
            created_at,
            sold_at: None,
            sold_price: None,
        }
    }

    pub fn is_sold(&self) -> bool {
        self.sold_at.is_some()
    }

    /// Mark this purchase as sold
    pub fn mark_sold(&mut self, price: Price, at: Timestamp) {
        self.sold_at = Some(at);
        self.sold_price = Some(price);
    }

    /// Realized profit, once sold
    pub fn realized_pnl(&self) -> Option<Price> {
        self.sold_price.map(|sold| sold - self.price)
    }
}
