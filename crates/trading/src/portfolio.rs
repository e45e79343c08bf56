use nftrader_core::{Price, Purchase, Trend};
use serde::{Deserialize, Serialize};

/// An unsold purchase valued at the current simulated price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub purchase: Purchase,
    /// Current estimate from the economy engine
    pub current_price: Price,
    /// Current estimate relative to the base price at purchase
    pub trend: Trend,
}

impl Holding {
    pub fn new(purchase: Purchase, current_price: Price) -> Self {
        let trend = Trend::between(purchase.base_price_at_purchase, current_price);
        Self {
            purchase,
            current_price,
            trend,
        }
    }

    /// Gain or loss if sold now
    pub fn unrealized_pnl(&self) -> Price {
        self.current_price - self.purchase.price
    }
}
