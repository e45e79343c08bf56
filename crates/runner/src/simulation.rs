//! Simulation - a timed demo of the market
//!
//! Runs the economy for a fixed duration while a demo trader watches prices:
//! - Waits for a few ticks of price movement
//! - Buys the cheapest affordable asset
//! - Sells it as soon as it trades above the purchase price
//!
//! Trade rejections are logged and the demo carries on. A failed
//! compensation ends the run, since the ledger can no longer be trusted.

use log::{info, warn};
use nftrader_clock::SystemClock;
use nftrader_core::{AssetId, Price, PurchaseId, Sparkline, Trend};
use nftrader_economy::{EconomyConfig, EconomyEngine};
use nftrader_ports::{Clock, DeltaStrategy};
use nftrader_trading::{InMemoryCatalog, TradeError, TradeReceipt};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::bootstrap::MarketBootstrap;
use crate::error::Result;

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Economy settings (tick interval, history, strategy)
    pub economy: EconomyConfig,
    /// Total simulation duration
    pub duration: Duration,
    /// User the demo trades as
    pub demo_user: String,
    /// Ticks to observe before the first buy
    pub buy_after_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            economy: EconomyConfig::default().with_tick_interval(Duration::from_secs(1)),
            duration: Duration::from_secs(10),
            demo_user: "demo-user".to_string(),
            buy_after_ticks: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// One executed demo trade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub side: TradeSide,
    pub asset_id: AssetId,
    pub price: Price,
    /// Wallet balance after the trade
    pub balance: Price,
    /// Engine tick count when the trade executed
    pub tick: u64,
}

/// Closing state of one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub id: AssetId,
    pub name: String,
    pub base_price: Price,
    pub price: Price,
    pub percent: Decimal,
    pub trend: Trend,
    pub sparkline: Option<Sparkline>,
}

/// Simulation results
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationResults {
    /// Ticks the engine ran
    pub ticks: u64,
    /// Final prices, in catalog order
    pub assets: Vec<AssetSummary>,
    /// Executed trades, oldest first
    pub trades: Vec<TradeRecord>,
    /// Trades refused by the desk (funds, ownership, ...)
    pub rejected: u64,
    /// Demo user's balance at the end
    pub final_balance: Option<Price>,
    /// Whether simulation completed successfully
    pub success: bool,
    /// Error message if any
    pub error: Option<String>,
}

/// The demo trader's open position
#[derive(Debug, Clone)]
struct Held {
    purchase_id: PurchaseId,
    asset_id: AssetId,
    paid: Price,
}

/// Timed demo over a bootstrapped market
pub struct MarketSimulation {
    config: SimulationConfig,
    market: MarketBootstrap,
}

impl MarketSimulation {
    /// Create a simulation over the sample catalog
    pub async fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_catalog(config, InMemoryCatalog::sample()).await
    }

    /// Create a simulation over a given catalog
    pub async fn with_catalog(config: SimulationConfig, catalog: InMemoryCatalog) -> Result<Self> {
        let market = MarketBootstrap::offline(
            config.economy.clone(),
            catalog,
            config.demo_user.clone(),
            Arc::new(SystemClock::new()),
        )
        .await?;
        Ok(Self { config, market })
    }

    /// Create a simulation with an explicit strategy and clock
    pub async fn with_strategy(
        config: SimulationConfig,
        strategy: Box<dyn DeltaStrategy>,
        catalog: InMemoryCatalog,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let market = MarketBootstrap::offline_with_strategy(
            config.economy.clone(),
            strategy,
            catalog,
            config.demo_user.clone(),
            clock,
        )
        .await?;
        Ok(Self { config, market })
    }

    pub fn engine(&self) -> &Arc<EconomyEngine> {
        self.market.economy.engine()
    }

    pub fn market(&self) -> &MarketBootstrap {
        &self.market
    }

    /// Run the full simulation
    pub async fn run(self) -> SimulationResults {
        let duration = self.config.duration;
        let poll = self.config.economy.tick_interval();
        info!(
            "Starting market simulation for {:?} (tick every {:?})",
            duration, poll
        );

        let mut results = SimulationResults::default();
        let mut holding = None;
        let deadline = Instant::now() + duration;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(poll.min(deadline - now)).await;

            match self.step(&mut holding).await {
                Ok(Some(record)) => results.trades.push(record),
                Ok(None) => {}
                Err(err) if err.needs_reconciliation() => {
                    results.error = Some(err.to_string());
                    break;
                }
                Err(err) => {
                    warn!("Demo trade rejected: {}", err);
                    results.rejected += 1;
                }
            }
        }

        info!("Simulation complete, shutting down...");
        self.market.economy.shutdown();

        results.ticks = self.engine().ticks();
        results.assets = self.summaries();
        results.final_balance = self.market.desk.my_balance().await.ok();
        results.success = results.error.is_none();

        info!(
            "Simulation finished: {} ticks, {} trades, {} rejected",
            results.ticks,
            results.trades.len(),
            results.rejected
        );

        results
    }

    /// One decision of the demo trader
    async fn step(
        &self,
        holding: &mut Option<Held>,
    ) -> std::result::Result<Option<TradeRecord>, TradeError> {
        let engine = self.engine();
        let tick = engine.ticks();

        if let Some(held) = holding.as_ref() {
            let quote = self.market.desk.quote(&held.asset_id).await?;
            if quote.price <= held.paid {
                return Ok(None);
            }

            let receipt = self.market.desk.sell(held.purchase_id).await?;
            *holding = None;
            return Ok(Some(record(TradeSide::Sell, receipt, tick)));
        }

        if tick < self.config.buy_after_ticks {
            return Ok(None);
        }

        let balance = self.market.desk.my_balance().await?;
        let owned = self.market.desk.owned_asset_ids().await?;
        let cheapest = self
            .market
            .assets
            .iter()
            .filter(|a| !owned.contains(&a.id))
            .map(|a| (a, engine.current_price(&a.id, a.base_price)))
            .filter(|(_, price)| *price > Decimal::ZERO && *price <= balance)
            .min_by(|(_, a), (_, b)| a.cmp(b));

        let Some((asset, _)) = cheapest else {
            return Ok(None);
        };

        let receipt = self.market.desk.buy(&asset.id).await?;
        *holding = Some(Held {
            purchase_id: receipt.purchase.id,
            asset_id: receipt.purchase.asset_id.clone(),
            paid: receipt.price,
        });
        Ok(Some(record(TradeSide::Buy, receipt, tick)))
    }

    fn summaries(&self) -> Vec<AssetSummary> {
        let engine = self.engine();
        self.market
            .assets
            .iter()
            .map(|asset| {
                let percent = engine.current_percent(&asset.id);
                let price = engine.current_price(&asset.id, asset.base_price);
                AssetSummary {
                    id: asset.id.clone(),
                    name: asset.name.clone(),
                    base_price: asset.base_price,
                    price,
                    percent,
                    trend: Trend::between(asset.base_price, price),
                    sparkline: Sparkline::from_history(&engine.history(&asset.id)),
                }
            })
            .collect()
    }
}

fn record(side: TradeSide, receipt: TradeReceipt, tick: u64) -> TradeRecord {
    info!(
        "Demo {:?} {} at {} (balance {})",
        side, receipt.purchase.asset_id, receipt.price, receipt.balance
    );
    TradeRecord {
        side,
        asset_id: receipt.purchase.asset_id,
        price: receipt.price,
        balance: receipt.balance,
        tick,
    }
}
