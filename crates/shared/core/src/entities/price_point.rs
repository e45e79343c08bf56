use serde::{Deserialize, Serialize};

use crate::values::{Price, Timestamp};

/// One sample of an asset's simulated price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: Timestamp,
    pub price: Price,
}

impl PricePoint {
    pub fn new(timestamp: Timestamp, price: Price) -> Self {
        Self { timestamp, price }
    }
}
