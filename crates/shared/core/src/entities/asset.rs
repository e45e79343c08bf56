use serde::{Deserialize, Serialize};

use crate::values::{AssetId, Price, Timestamp};

/// A catalog entry - one fictional NFT that can be bought and sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// Price at offset zero; never changes once the asset is listed
    pub base_price: Price,
    pub image_url: Option<String>,
    /// Free-form metadata carried through from the catalog
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<Timestamp>,
}

impl Asset {
    /// Create a catalog entry with only the fields the simulation needs
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, base_price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            image_url: None,
            metadata: None,
            created_at: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }
}
