use async_trait::async_trait;
use nftrader_core::Asset;

use crate::error::PortResult;

/// Port for the asset catalog
#[async_trait]
pub trait AssetCatalog: Send + Sync {
    /// All listed assets, oldest first
    async fn list_assets(&self) -> PortResult<Vec<Asset>>;

    /// A single asset; `PortError::NotFound` if it is not listed
    async fn get_asset(&self, id: &str) -> PortResult<Asset>;
}
