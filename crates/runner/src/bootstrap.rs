//! Bootstrap - market setup for an offline run
//!
//! Handles initial setup of the market:
//! - Loading the catalog (built-in sample or a JSON file)
//! - Starting the economy and registering every catalog asset
//! - Wiring the trade desk to in-memory adapters and signing in the demo user

use log::info;
use nftrader_core::{Asset, UserId};
use nftrader_economy::{Economy, EconomyConfig};
use nftrader_ports::{Clock, DeltaStrategy};
use nftrader_trading::{
    InMemoryCatalog, InMemoryPurchaseStore, InMemoryWalletStore, StaticIdentity, TradeDesk,
    WalletService, track_catalog,
};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, RunnerError};

/// Load catalog rows from a JSON file, or the sample catalog without one
pub fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalog> {
    let Some(path) = path else {
        return Ok(InMemoryCatalog::sample());
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| RunnerError::Catalog(format!("{}: {}", path.display(), e)))?;
    InMemoryCatalog::from_json(&content)
        .map_err(|e| RunnerError::Catalog(format!("{}: {}", path.display(), e)))
}

/// A running market wired to in-memory adapters
pub struct MarketBootstrap {
    /// The running economy (engine + ticker)
    pub economy: Economy,
    /// Buy/sell workflow for the signed-in user
    pub desk: TradeDesk,
    pub catalog: Arc<InMemoryCatalog>,
    pub identity: Arc<StaticIdentity>,
    pub wallets: Arc<InMemoryWalletStore>,
    pub purchases: Arc<InMemoryPurchaseStore>,
    /// Catalog assets, in creation order
    pub assets: Vec<Asset>,
}

impl MarketBootstrap {
    /// Start a market with the strategy named in `config`
    pub async fn offline(
        config: EconomyConfig,
        catalog: InMemoryCatalog,
        user: impl Into<UserId>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let economy = Economy::start(config, clock.clone())?;
        Self::assemble(economy, catalog, user.into(), clock).await
    }

    /// Start a market with an explicit strategy
    pub async fn offline_with_strategy(
        config: EconomyConfig,
        strategy: Box<dyn DeltaStrategy>,
        catalog: InMemoryCatalog,
        user: impl Into<UserId>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let economy = Economy::start_with_strategy(config, strategy, clock.clone())?;
        Self::assemble(economy, catalog, user.into(), clock).await
    }

    async fn assemble(
        economy: Economy,
        catalog: InMemoryCatalog,
        user: UserId,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let catalog = Arc::new(catalog);
        let assets = track_catalog(catalog.as_ref(), economy.engine()).await?;

        let identity = Arc::new(StaticIdentity::signed_in(user.clone()));
        let wallets = Arc::new(InMemoryWalletStore::new());
        let purchases = Arc::new(InMemoryPurchaseStore::new());

        let desk = TradeDesk::new(
            economy.engine().clone(),
            catalog.clone(),
            identity.clone(),
            WalletService::new(wallets.clone()),
            purchases.clone(),
            clock,
        );
        let balance = desk.my_balance().await?;

        info!(
            "Market ready: {} assets, user '{}' with balance {}",
            assets.len(),
            user,
            balance
        );

        Ok(Self {
            economy,
            desk,
            catalog,
            identity,
            wallets,
            purchases,
            assets,
        })
    }

    /// Get a catalog asset by id
    pub fn get_asset(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }
}
