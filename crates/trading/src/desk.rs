//! Trade Desk - buy and sell at the simulated market price
//!
//! The hosted data service offers no transactions, so a trade is a ledger
//! mutation followed by an ownership write. When the ownership write fails
//! the ledger mutation is reversed with a compensating entry. The
//! compensation is attempted once; if it fails too the caller receives
//! [`TradeError::CompensationFailed`] and the ledger needs reconciliation.

use log::{error, info, warn};
use nftrader_core::{
    Asset, AssetId, Percent, Price, PricePoint, Purchase, PurchaseId, Trend, UserId,
};
use nftrader_economy::EconomyEngine;
use nftrader_ports::{AssetCatalog, Clock, IdentityProvider, PortError, PurchaseStore};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Result, TradeError};
use crate::portfolio::Holding;
use crate::wallet::WalletService;

/// Outcome of a successful buy or sell
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub purchase: Purchase,
    /// Price the trade executed at
    pub price: Price,
    /// Wallet balance after the trade
    pub balance: Price,
}

/// What a presentation layer shows for one asset
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub asset: Asset,
    pub percent: Percent,
    pub price: Price,
    /// Current price against the base price
    pub trend: Trend,
    pub history: Vec<PricePoint>,
}

/// Ledger direction of a trade's first step
#[derive(Debug, Clone, Copy)]
enum LedgerStep {
    Debit,
    Credit,
}

/// Buy/sell workflow for the signed-in user
pub struct TradeDesk {
    engine: Arc<EconomyEngine>,
    catalog: Arc<dyn AssetCatalog>,
    identity: Arc<dyn IdentityProvider>,
    wallets: WalletService,
    purchases: Arc<dyn PurchaseStore>,
    clock: Arc<dyn Clock>,
}

impl TradeDesk {
    pub fn new(
        engine: Arc<EconomyEngine>,
        catalog: Arc<dyn AssetCatalog>,
        identity: Arc<dyn IdentityProvider>,
        wallets: WalletService,
        purchases: Arc<dyn PurchaseStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            catalog,
            identity,
            wallets,
            purchases,
            clock,
        }
    }

    pub fn engine(&self) -> &Arc<EconomyEngine> {
        &self.engine
    }

    pub fn wallets(&self) -> &WalletService {
        &self.wallets
    }

    /// Resolve the signed-in user or fail with `NotSignedIn`
    pub async fn current_user(&self) -> Result<UserId> {
        self.identity
            .current_user()
            .await?
            .ok_or(TradeError::NotSignedIn)
    }

    /// Current balance of the signed-in user, creating the wallet if needed
    pub async fn my_balance(&self) -> Result<Price> {
        let user = self.current_user().await?;
        self.wallets.ensure_wallet(&user).await
    }

    /// Current market view of an asset; starts tracking it if needed
    pub async fn quote(&self, asset_id: &str) -> Result<Quote> {
        let asset = self.load_asset(asset_id).await?;
        self.engine.ensure_tracked(&asset.id, asset.base_price);

        let (percent, history) = match self.engine.snapshot(&asset.id) {
            Some(snapshot) => (snapshot.percent, snapshot.history),
            None => (Percent::ZERO, Vec::new()),
        };
        let price = nftrader_core::compute_price(asset.base_price, percent);

        Ok(Quote {
            trend: Trend::between(asset.base_price, price),
            asset,
            percent,
            price,
            history,
        })
    }

    /// Buy an asset at its current price
    pub async fn buy(&self, asset_id: &str) -> Result<TradeReceipt> {
        let user = self.current_user().await?;
        let asset = self.load_asset(asset_id).await?;
        self.engine.ensure_tracked(&asset.id, asset.base_price);

        if self
            .purchases
            .find_unsold(&user, &asset.id)
            .await?
            .is_some()
        {
            return Err(TradeError::AlreadyOwned(asset.id));
        }

        let price = self.engine.current_price(&asset.id, asset.base_price);
        self.wallets.ensure_wallet(&user).await?;
        // A failed debit aborts before anything is written
        let balance = self.wallets.debit(&user, price).await?;

        let purchase = Purchase::new(
            user.clone(),
            asset.id.clone(),
            price,
            asset.base_price,
            self.clock.now(),
        );
        match self.purchases.insert(purchase).await {
            Ok(purchase) => {
                info!("{} bought {} for {}", user, asset.id, price);
                Ok(TradeReceipt {
                    purchase,
                    price,
                    balance,
                })
            }
            Err(err) => Err(self.compensate(LedgerStep::Debit, &user, price, err).await),
        }
    }

    /// Sell a purchase at the asset's current price
    pub async fn sell(&self, purchase_id: PurchaseId) -> Result<TradeReceipt> {
        let user = self.current_user().await?;
        let purchase = self
            .purchases
            .get(purchase_id)
            .await?
            .ok_or(TradeError::UnknownPurchase(purchase_id))?;

        if purchase.user_id != user {
            return Err(TradeError::NotOwned(purchase_id.to_string()));
        }
        if purchase.is_sold() {
            return Err(TradeError::AlreadySold(purchase_id));
        }

        let base_price = match self.catalog.get_asset(&purchase.asset_id).await {
            Ok(asset) => asset.base_price,
            // Delisted: value it from the base recorded at purchase
            Err(PortError::NotFound(_)) => purchase.base_price_at_purchase,
            Err(e) => return Err(e.into()),
        };
        self.engine.ensure_tracked(&purchase.asset_id, base_price);
        let price = self.engine.current_price(&purchase.asset_id, base_price);

        self.wallets.ensure_wallet(&user).await?;
        let balance = self.wallets.credit(&user, price).await?;

        match self
            .purchases
            .mark_sold(purchase_id, price, self.clock.now())
            .await
        {
            Ok(purchase) => {
                info!("{} sold {} for {}", user, purchase.asset_id, price);
                Ok(TradeReceipt {
                    purchase,
                    price,
                    balance,
                })
            }
            Err(err) => Err(self.compensate(LedgerStep::Credit, &user, price, err).await),
        }
    }

    /// Sell the signed-in user's unsold purchase of an asset
    pub async fn sell_asset(&self, asset_id: &str) -> Result<TradeReceipt> {
        let user = self.current_user().await?;
        let purchase = self
            .purchases
            .find_unsold(&user, asset_id)
            .await?
            .ok_or_else(|| TradeError::NotOwned(asset_id.to_string()))?;
        self.sell(purchase.id).await
    }

    /// Ids of assets the signed-in user currently owns
    pub async fn owned_asset_ids(&self) -> Result<HashSet<AssetId>> {
        let user = self.current_user().await?;
        Ok(self
            .purchases
            .list_for_user(&user)
            .await?
            .into_iter()
            .filter(|p| !p.is_sold())
            .map(|p| p.asset_id)
            .collect())
    }

    /// Unsold purchases of `user`, valued at current prices (newest first)
    pub async fn holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        let purchases = self.purchases.list_for_user(user_id).await?;
        Ok(purchases
            .into_iter()
            .filter(|p| !p.is_sold())
            .map(|p| {
                let base = self
                    .engine
                    .base_price(&p.asset_id)
                    .unwrap_or(p.base_price_at_purchase);
                let current = self.engine.current_price(&p.asset_id, base);
                Holding::new(p, current)
            })
            .collect())
    }

    /// Holdings of the signed-in user
    pub async fn my_holdings(&self) -> Result<Vec<Holding>> {
        let user = self.current_user().await?;
        self.holdings(&user).await
    }

    async fn load_asset(&self, asset_id: &str) -> Result<Asset> {
        match self.catalog.get_asset(asset_id).await {
            Ok(asset) => Ok(asset),
            Err(PortError::NotFound(_)) => Err(TradeError::UnknownAsset(asset_id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Reverse `step` after the ownership write failed with `original`
    async fn compensate(
        &self,
        step: LedgerStep,
        user: &str,
        amount: Price,
        original: PortError,
    ) -> TradeError {
        warn!(
            "Ownership write failed for {} ({}), reversing {:?} of {}",
            user, original, step, amount
        );

        let reversal = match step {
            LedgerStep::Debit => self.wallets.credit(user, amount).await,
            LedgerStep::Credit => self.wallets.debit(user, amount).await,
        };

        match reversal {
            Ok(balance) => {
                info!("Reversed {:?} of {} for {}, balance {}", step, amount, user, balance);
                TradeError::Port(original)
            }
            Err(compensation) => {
                error!(
                    "Compensation failed for {}: {} of {} not reversed: {}",
                    user, original, amount, compensation
                );
                TradeError::CompensationFailed {
                    user_id: user.to_string(),
                    amount,
                    original,
                    compensation: Box::new(compensation),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryCatalog, InMemoryPurchaseStore, InMemoryWalletStore, StaticIdentity};
    use chrono::Utc;
    use nftrader_clock::WorldClock;
    use nftrader_economy::ScriptedDeltas;
    use rust_decimal_macros::dec;

    fn desk(deltas: Vec<Percent>, identity: StaticIdentity) -> TradeDesk {
        let clock = WorldClock::fixed(Utc::now());
        let engine = Arc::new(EconomyEngine::new(
            Box::new(ScriptedDeltas::new(deltas)),
            clock.clone(),
        ));
        TradeDesk::new(
            engine,
            Arc::new(InMemoryCatalog::sample()),
            Arc::new(identity),
            WalletService::new(Arc::new(InMemoryWalletStore::new())),
            Arc::new(InMemoryPurchaseStore::new()),
            clock,
        )
    }

    #[tokio::test]
    async fn test_quote_tracks_and_prices() {
        let desk = desk(vec![dec!(10)], StaticIdentity::anonymous());

        let quote = desk.quote("1").await.unwrap();
        assert_eq!(quote.price, dec!(120.0));
        assert_eq!(quote.trend, Trend::Flat);
        assert_eq!(quote.history.len(), 1);
        assert!(desk.engine().is_tracked("1"));

        desk.engine().tick();
        let quote = desk.quote("1").await.unwrap();
        assert_eq!(quote.percent, dec!(10));
        assert_eq!(quote.price, dec!(132.00));
        assert_eq!(quote.trend, Trend::Up);
    }

    #[tokio::test]
    async fn test_unknown_asset() {
        let desk = desk(vec![], StaticIdentity::signed_in("alice"));
        assert_eq!(
            desk.buy("404").await,
            Err(TradeError::UnknownAsset("404".to_string()))
        );
        assert!(!desk.engine().is_tracked("404"));
    }

    #[tokio::test]
    async fn test_anonymous_user_cannot_trade() {
        let desk = desk(vec![], StaticIdentity::anonymous());
        assert_eq!(desk.buy("1").await, Err(TradeError::NotSignedIn));
        assert_eq!(desk.my_balance().await, Err(TradeError::NotSignedIn));
        assert_eq!(desk.sell_asset("1").await, Err(TradeError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_sell_asset_requires_ownership() {
        let desk = desk(vec![], StaticIdentity::signed_in("alice"));
        assert_eq!(
            desk.sell_asset("2").await,
            Err(TradeError::NotOwned("2".to_string()))
        );
    }
}
