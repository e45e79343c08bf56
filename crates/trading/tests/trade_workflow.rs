//! End-to-end buy/sell workflows against in-memory adapters

use async_trait::async_trait;
use chrono::Utc;
use nftrader_clock::WorldClock;
use nftrader_core::{Percent, Price, Purchase, PurchaseId, Timestamp, Trend};
use nftrader_economy::{EconomyEngine, ScriptedDeltas};
use nftrader_ports::{PortError, PortResult, PurchaseStore, WalletStore};
use nftrader_trading::{
    InMemoryCatalog, InMemoryPurchaseStore, InMemoryWalletStore, StaticIdentity, TradeDesk,
    TradeError, WalletService,
};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct Fixture {
    desk: TradeDesk,
    identity: Arc<StaticIdentity>,
    wallets: Arc<InMemoryWalletStore>,
    purchases: Arc<InMemoryPurchaseStore>,
}

fn fixture(deltas: Vec<Percent>) -> Fixture {
    let _ = env_logger::try_init();

    let wallets = Arc::new(InMemoryWalletStore::new());
    fixture_with_wallets(deltas, wallets.clone(), wallets)
}

fn fixture_with_wallets(
    deltas: Vec<Percent>,
    wallet_store: Arc<dyn WalletStore>,
    wallets: Arc<InMemoryWalletStore>,
) -> Fixture {
    let clock = WorldClock::fixed(Utc::now());
    let engine = Arc::new(EconomyEngine::new(
        Box::new(ScriptedDeltas::new(deltas)),
        clock.clone(),
    ));
    let identity = Arc::new(StaticIdentity::signed_in("alice"));
    let purchases = Arc::new(InMemoryPurchaseStore::new());

    let desk = TradeDesk::new(
        engine,
        Arc::new(InMemoryCatalog::sample()),
        identity.clone(),
        WalletService::new(wallet_store),
        purchases.clone(),
        clock,
    );

    Fixture {
        desk,
        identity,
        wallets,
        purchases,
    }
}

/// Wallet store whose updates start failing after the first `healthy` ones
struct DegradingWallets {
    inner: InMemoryWalletStore,
    healthy: usize,
    updates: AtomicUsize,
}

#[async_trait]
impl WalletStore for DegradingWallets {
    async fn fetch_balance(&self, user_id: &str) -> PortResult<Option<Price>> {
        self.inner.fetch_balance(user_id).await
    }

    async fn insert_wallet(&self, user_id: &str, balance: Price) -> PortResult<Price> {
        self.inner.insert_wallet(user_id, balance).await
    }

    async fn update_balance(&self, user_id: &str, balance: Price) -> PortResult<Price> {
        if self.updates.fetch_add(1, Ordering::SeqCst) >= self.healthy {
            return Err(PortError::Unavailable("wallet service down".to_string()));
        }
        self.inner.update_balance(user_id, balance).await
    }
}

/// Purchase store that serves the first read of each purchase forever,
/// like a second session holding a stale copy
#[derive(Default)]
struct StaleReads {
    inner: InMemoryPurchaseStore,
    seen: Mutex<HashMap<PurchaseId, Purchase>>,
}

#[async_trait]
impl PurchaseStore for StaleReads {
    async fn insert(&self, purchase: Purchase) -> PortResult<Purchase> {
        self.inner.insert(purchase).await
    }

    async fn get(&self, id: PurchaseId) -> PortResult<Option<Purchase>> {
        let cached = self.seen.lock().unwrap().get(&id).cloned();
        if cached.is_some() {
            return Ok(cached);
        }
        let fresh = self.inner.get(id).await?;
        if let Some(purchase) = &fresh {
            self.seen.lock().unwrap().insert(id, purchase.clone());
        }
        Ok(fresh)
    }

    async fn list_for_user(&self, user_id: &str) -> PortResult<Vec<Purchase>> {
        self.inner.list_for_user(user_id).await
    }

    async fn find_unsold(&self, user_id: &str, asset_id: &str) -> PortResult<Option<Purchase>> {
        self.inner.find_unsold(user_id, asset_id).await
    }

    async fn mark_sold(&self, id: PurchaseId, price: Price, at: Timestamp) -> PortResult<Purchase> {
        self.inner.mark_sold(id, price, at).await
    }
}

#[tokio::test]
async fn test_buy_debits_current_price() {
    let f = fixture(vec![dec!(10)]);

    // Tracking starts on first view, the tick moves the price
    f.desk.quote("1").await.unwrap();
    f.desk.engine().tick();

    let receipt = f.desk.buy("1").await.unwrap();
    assert_eq!(receipt.price, dec!(132.00));
    assert_eq!(receipt.balance, dec!(168.00));
    assert_eq!(receipt.purchase.price, dec!(132.00));
    assert_eq!(receipt.purchase.base_price_at_purchase, dec!(120.0));
    assert_eq!(f.wallets.fetch_balance("alice").await.unwrap(), Some(dec!(168.00)));

    let owned = f.desk.owned_asset_ids().await.unwrap();
    assert!(owned.contains("1"));
    assert_eq!(owned.len(), 1);
}

#[tokio::test]
async fn test_duplicate_buy_rejected() {
    let f = fixture(vec![]);
    f.desk.buy("1").await.unwrap();

    assert_eq!(
        f.desk.buy("1").await,
        Err(TradeError::AlreadyOwned("1".to_string()))
    );
    assert_eq!(f.desk.my_balance().await.unwrap(), dec!(180.0));
    assert_eq!(f.purchases.len().await, 1);
}

#[tokio::test]
async fn test_insufficient_funds_writes_nothing() {
    let f = fixture(vec![]);
    f.desk.buy("1").await.unwrap();

    assert_eq!(
        f.desk.buy("2").await,
        Err(TradeError::InsufficientFunds {
            balance: dec!(180.0),
            required: dec!(280.5),
        })
    );
    assert_eq!(f.purchases.len().await, 1);
    assert_eq!(f.desk.my_balance().await.unwrap(), dec!(180.0));
}

#[tokio::test]
async fn test_failed_insert_restores_balance() {
    let f = fixture(vec![]);
    f.purchases.fail_next_inserts(1);

    let err = f.desk.buy("3").await.unwrap_err();
    assert!(matches!(err, TradeError::Port(PortError::Unavailable(_))));
    assert!(!err.needs_reconciliation());
    assert_eq!(f.desk.my_balance().await.unwrap(), dec!(300));
    assert!(f.purchases.is_empty().await);

    // Nothing half-done blocks a retry
    let receipt = f.desk.buy("3").await.unwrap();
    assert_eq!(receipt.balance, dec!(224.75));
}

#[tokio::test]
async fn test_failed_compensation_is_reported() {
    let _ = env_logger::try_init();
    // The debit goes through, the compensating credit does not
    let store = Arc::new(DegradingWallets {
        inner: InMemoryWalletStore::new(),
        healthy: 1,
        updates: AtomicUsize::new(0),
    });
    let f = fixture_with_wallets(vec![], store.clone(), Arc::new(InMemoryWalletStore::new()));
    f.purchases.fail_next_inserts(1);

    let err = f.desk.buy("1").await.unwrap_err();
    assert!(err.needs_reconciliation());
    match err {
        TradeError::CompensationFailed {
            user_id,
            amount,
            original,
            compensation,
        } => {
            assert_eq!(user_id, "alice");
            assert_eq!(amount, dec!(120.0));
            assert!(matches!(original, PortError::Unavailable(_)));
            assert!(matches!(*compensation, TradeError::Port(PortError::Unavailable(_))));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // The ledger kept the debit
    assert_eq!(store.fetch_balance("alice").await.unwrap(), Some(dec!(180.0)));
    assert!(f.purchases.is_empty().await);
}

#[tokio::test]
async fn test_sell_credits_current_price() {
    let f = fixture(vec![dec!(10)]);
    let bought = f.desk.buy("1").await.unwrap();
    assert_eq!(bought.balance, dec!(180.0));

    f.desk.engine().tick();
    let sold = f.desk.sell(bought.purchase.id).await.unwrap();
    assert_eq!(sold.price, dec!(132.00));
    assert_eq!(sold.balance, dec!(312.00));
    assert_eq!(sold.purchase.sold_price, Some(dec!(132.00)));
    assert_eq!(sold.purchase.realized_pnl(), Some(dec!(12.00)));

    assert!(f.desk.my_holdings().await.unwrap().is_empty());
    assert_eq!(
        f.desk.sell(bought.purchase.id).await,
        Err(TradeError::AlreadySold(bought.purchase.id))
    );
}

#[tokio::test]
async fn test_sell_asset_by_id() {
    let f = fixture(vec![]);
    f.desk.buy("3").await.unwrap();

    let sold = f.desk.sell_asset("3").await.unwrap();
    assert_eq!(sold.price, dec!(75.25));
    assert_eq!(sold.balance, dec!(300.00));
    assert!(f.desk.owned_asset_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_sale_reverses_credit() {
    let f = fixture(vec![]);
    let bought = f.desk.buy("1").await.unwrap();
    f.purchases.fail_next_sales(1);

    let err = f.desk.sell(bought.purchase.id).await.unwrap_err();
    assert!(matches!(err, TradeError::Port(PortError::Unavailable(_))));
    assert_eq!(f.desk.my_balance().await.unwrap(), dec!(180.0));

    let holdings = f.desk.my_holdings().await.unwrap();
    assert_eq!(holdings.len(), 1);
    assert!(!holdings[0].purchase.is_sold());
}

#[tokio::test]
async fn test_cannot_sell_another_users_purchase() {
    let f = fixture(vec![]);
    let bought = f.desk.buy("1").await.unwrap();

    f.identity.sign_in("bob").await;
    assert_eq!(
        f.desk.sell(bought.purchase.id).await,
        Err(TradeError::NotOwned(bought.purchase.id.to_string()))
    );
    // Bob's fresh wallet is untouched
    assert_eq!(f.desk.my_balance().await.unwrap(), dec!(300));
}

#[tokio::test]
async fn test_signed_out_user_is_rejected() {
    let f = fixture(vec![]);
    f.identity.sign_out().await;

    assert_eq!(f.desk.buy("1").await, Err(TradeError::NotSignedIn));
    assert_eq!(f.desk.my_holdings().await, Err(TradeError::NotSignedIn));
    assert!(f.purchases.is_empty().await);
}

#[tokio::test]
async fn test_holdings_follow_the_market() {
    let f = fixture(vec![dec!(-10), dec!(25)]);
    f.desk.buy("1").await.unwrap();
    f.desk.buy("3").await.unwrap();

    f.desk.engine().tick();
    let holdings = f.desk.holdings("alice").await.unwrap();
    assert_eq!(holdings.len(), 2);
    for holding in &holdings {
        let id = holding.purchase.asset_id.as_str();
        let percent = f.desk.engine().current_percent(id);
        let expected = nftrader_core::compute_price(holding.purchase.base_price_at_purchase, percent);
        assert_eq!(holding.current_price, expected);
        assert_eq!(
            holding.trend,
            Trend::between(holding.purchase.base_price_at_purchase, expected)
        );
    }

    // Other users see nothing of alice's portfolio
    assert!(f.desk.holdings("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_double_sell_is_credited_once() {
    let _ = env_logger::try_init();

    let clock = WorldClock::fixed(Utc::now());
    let engine = Arc::new(EconomyEngine::new(
        Box::new(ScriptedDeltas::new(vec![])),
        clock.clone(),
    ));
    let wallets = Arc::new(InMemoryWalletStore::new());
    let purchases = Arc::new(StaleReads::default());
    let desk = TradeDesk::new(
        engine,
        Arc::new(InMemoryCatalog::sample()),
        Arc::new(StaticIdentity::signed_in("alice")),
        WalletService::new(wallets.clone()),
        purchases.clone(),
        clock,
    );

    let bought = desk.buy("1").await.unwrap();
    assert_eq!(bought.balance, dec!(180.0));

    let sold = desk.sell(bought.purchase.id).await.unwrap();
    assert_eq!(sold.balance, dec!(300.0));

    // The stale read still shows the purchase unsold; the store refuses the
    // second sale and the credit is reversed
    let err = desk.sell(bought.purchase.id).await.unwrap_err();
    assert!(matches!(err, TradeError::Port(PortError::Conflict(_))));
    assert!(!err.needs_reconciliation());
    assert_eq!(wallets.fetch_balance("alice").await.unwrap(), Some(dec!(300.0)));

    let stored = purchases.inner.get(bought.purchase.id).await.unwrap().unwrap();
    assert_eq!(stored.sold_price, Some(dec!(120.0)));
}
