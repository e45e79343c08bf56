//! In-memory adapters for the data-service ports
//!
//! Stand-ins for the hosted database/auth service, used by tests and by
//! offline runs. The wallet and purchase stores can be told to fail their
//! next N writes to exercise compensation paths.

use async_trait::async_trait;
use dashmap::DashMap;
use nftrader_core::{Asset, Price, Purchase, PurchaseId, Timestamp, UserId};
use nftrader_ports::{
    AssetCatalog, IdentityProvider, PortError, PortResult, PurchaseStore, WalletStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::catalog::{CatalogRow, parse_catalog, sample_assets};

/// Counts down injected failures
#[derive(Debug, Default)]
struct FailureBudget(AtomicUsize);

impl FailureBudget {
    fn arm(&self, count: usize) {
        self.0.store(count, Ordering::SeqCst);
    }

    /// Consume one failure if any are armed
    fn check(&self, operation: &str) -> PortResult<()> {
        let consumed = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if consumed {
            Err(PortError::Unavailable(format!("injected failure on {}", operation)))
        } else {
            Ok(())
        }
    }
}

/// Catalog held in memory, ordered by creation time
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    assets: RwLock<Vec<Asset>>,
}

impl InMemoryCatalog {
    pub fn new(assets: Vec<Asset>) -> Self {
        let mut assets = assets;
        assets.sort_by_key(|a| a.created_at);
        Self {
            assets: RwLock::new(assets),
        }
    }

    /// The built-in sample catalog
    pub fn sample() -> Self {
        Self::new(sample_assets())
    }

    /// Load catalog rows from JSON (array of [`CatalogRow`])
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(parse_catalog(json)?))
    }

    pub async fn add(&self, asset: Asset) {
        let mut assets = self.assets.write().await;
        assets.push(asset);
        assets.sort_by_key(|a| a.created_at);
    }

    pub async fn add_row(&self, row: CatalogRow) {
        self.add(row.into()).await;
    }
}

#[async_trait]
impl AssetCatalog for InMemoryCatalog {
    async fn list_assets(&self) -> PortResult<Vec<Asset>> {
        Ok(self.assets.read().await.clone())
    }

    async fn get_asset(&self, id: &str) -> PortResult<Asset> {
        self.assets
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("asset {}", id)))
    }
}

/// Identity provider with a session set by hand
#[derive(Debug, Default)]
pub struct StaticIdentity {
    user: RwLock<Option<UserId>>,
}

impl StaticIdentity {
    pub fn signed_in(user_id: impl Into<UserId>) -> Self {
        Self {
            user: RwLock::new(Some(user_id.into())),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub async fn sign_in(&self, user_id: impl Into<UserId>) {
        *self.user.write().await = Some(user_id.into());
    }

    pub async fn sign_out(&self) {
        *self.user.write().await = None;
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> PortResult<Option<UserId>> {
        Ok(self.user.read().await.clone())
    }
}

/// Wallet rows keyed by user
#[derive(Debug, Default)]
pub struct InMemoryWalletStore {
    balances: DashMap<UserId, Price>,
    failing_updates: FailureBudget,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` balance updates fail
    pub fn fail_next_updates(&self, count: usize) {
        self.failing_updates.arm(count);
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn fetch_balance(&self, user_id: &str) -> PortResult<Option<Price>> {
        Ok(self.balances.get(user_id).map(|b| *b))
    }

    async fn insert_wallet(&self, user_id: &str, balance: Price) -> PortResult<Price> {
        match self.balances.entry(user_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(PortError::Conflict(format!(
                "wallet for {} already exists",
                user_id
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(balance);
                Ok(balance)
            }
        }
    }

    async fn update_balance(&self, user_id: &str, balance: Price) -> PortResult<Price> {
        self.failing_updates.check("update_balance")?;
        let mut entry = self
            .balances
            .get_mut(user_id)
            .ok_or_else(|| PortError::NotFound(format!("wallet for {}", user_id)))?;
        *entry = balance;
        Ok(balance)
    }
}

/// Purchase records held in memory
#[derive(Debug, Default)]
pub struct InMemoryPurchaseStore {
    purchases: RwLock<Vec<Purchase>>,
    failing_inserts: FailureBudget,
    failing_sales: FailureBudget,
}

impl InMemoryPurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` inserts fail
    pub fn fail_next_inserts(&self, count: usize) {
        self.failing_inserts.arm(count);
    }

    /// Make the next `count` sale updates fail
    pub fn fail_next_sales(&self, count: usize) {
        self.failing_sales.arm(count);
    }

    pub async fn len(&self) -> usize {
        self.purchases.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.purchases.read().await.is_empty()
    }
}

#[async_trait]
impl PurchaseStore for InMemoryPurchaseStore {
    async fn insert(&self, purchase: Purchase) -> PortResult<Purchase> {
        self.failing_inserts.check("insert purchase")?;
        let mut purchases = self.purchases.write().await;
        if purchases.iter().any(|p| p.id == purchase.id) {
            return Err(PortError::Conflict(format!("purchase {}", purchase.id)));
        }
        purchases.push(purchase.clone());
        Ok(purchase)
    }

    async fn get(&self, id: PurchaseId) -> PortResult<Option<Purchase>> {
        Ok(self
            .purchases
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> PortResult<Vec<Purchase>> {
        let mut mine: Vec<Purchase> = self
            .purchases
            .read()
            .await
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_unsold(&self, user_id: &str, asset_id: &str) -> PortResult<Option<Purchase>> {
        Ok(self
            .purchases
            .read()
            .await
            .iter()
            .find(|p| p.user_id == user_id && p.asset_id == asset_id && !p.is_sold())
            .cloned())
    }

    async fn mark_sold(&self, id: PurchaseId, price: Price, at: Timestamp) -> PortResult<Purchase> {
        self.failing_sales.check("mark purchase sold")?;
        let mut purchases = self.purchases.write().await;
        let purchase = purchases
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PortError::NotFound(format!("purchase {}", id)))?;
        if purchase.is_sold() {
            return Err(PortError::Conflict(format!("purchase {} already sold", id)));
        }
        purchase.mark_sold(price, at);
        Ok(purchase.clone())
    }
}
