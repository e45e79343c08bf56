//! Economy Engine
//!
//! Owns the simulated market state of every tracked asset:
//! - the cumulative percentage offset applied to its base price
//! - a bounded, insertion-ordered history of computed prices
//!
//! State for one asset is an immutable [`AssetState`] behind an `Arc`. A tick
//! builds the next state aside and swaps it in with a single store, so a
//! reader observes either the previous or the next tick, never a mix of
//! the two.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::{debug, info, trace, warn};
use nftrader_core::{
    AssetId, MAX_BASE_PRICE, Percent, Price, PricePoint, Timestamp, compute_price, round2,
};
use nftrader_ports::{Clock, DeltaStrategy};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::EconomyConfig;

/// Default number of price samples kept per asset
pub const MAX_HISTORY_POINTS: usize = 60;

/// Published state of one tracked asset
#[derive(Debug, Clone)]
struct AssetState {
    base_price: Price,
    percent: Percent,
    history: VecDeque<PricePoint>,
}

impl AssetState {
    fn seeded(base_price: Price, now: Timestamp, capacity: usize) -> Self {
        let mut history = VecDeque::with_capacity(capacity);
        history.push_back(PricePoint::new(now, compute_price(base_price, Decimal::ZERO)));
        Self {
            base_price,
            percent: Decimal::ZERO,
            history,
        }
    }

    /// Next state after applying `delta`, evicting the oldest samples beyond `cap`
    fn advanced(&self, delta: Percent, now: Timestamp, cap: usize) -> Self {
        let percent = round2(self.percent.saturating_add(delta));
        let mut history = self.history.clone();
        history.push_back(PricePoint::new(now, compute_price(self.base_price, percent)));
        while history.len() > cap {
            history.pop_front();
        }
        Self {
            base_price: self.base_price,
            percent,
            history,
        }
    }
}

/// Consistent view of one asset: offset and history from the same tick
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSnapshot {
    pub id: AssetId,
    pub base_price: Price,
    pub percent: Percent,
    pub history: Vec<PricePoint>,
}

impl AssetSnapshot {
    /// Price implied by this snapshot's offset
    pub fn current_price(&self) -> Price {
        compute_price(self.base_price, self.percent)
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&PricePoint> {
        self.history.last()
    }
}

/// Per-asset price simulation
///
/// Registration and reads may come from any thread. Ticks are serialised:
/// `tick()` holds the strategy lock for its whole duration.
pub struct EconomyEngine {
    assets: DashMap<AssetId, Arc<AssetState>>,
    strategy: Mutex<Box<dyn DeltaStrategy>>,
    clock: Arc<dyn Clock>,
    max_history_points: usize,
    ticks: AtomicU64,
}

impl EconomyEngine {
    /// Create an engine with the default history limit
    pub fn new(strategy: Box<dyn DeltaStrategy>, clock: Arc<dyn Clock>) -> Self {
        Self {
            assets: DashMap::new(),
            strategy: Mutex::new(strategy),
            clock,
            max_history_points: MAX_HISTORY_POINTS,
            ticks: AtomicU64::new(0),
        }
    }

    /// Create an engine from configuration (strategy and history limit)
    pub fn from_config(config: &EconomyConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.strategy.build(), clock).with_history_limit(config.max_history_points)
    }

    /// Change how many samples are kept per asset (at least one)
    pub fn with_history_limit(mut self, points: usize) -> Self {
        self.max_history_points = points.max(1);
        self
    }

    pub fn history_limit(&self) -> usize {
        self.max_history_points
    }

    /// Start tracking `id` at `base_price`
    ///
    /// First registration wins: a repeat call is a no-op whatever base price
    /// it carries. Empty ids, negative base prices and base prices above
    /// [`MAX_BASE_PRICE`] are ignored. Returns whether a new asset was
    /// registered.
    pub fn ensure_tracked(&self, id: &str, base_price: Price) -> bool {
        if id.is_empty() {
            trace!("Ignoring registration with empty asset id");
            return false;
        }
        if base_price.is_sign_negative() && !base_price.is_zero() {
            warn!("Ignoring asset {} with negative base price {}", id, base_price);
            return false;
        }
        if base_price > MAX_BASE_PRICE {
            warn!(
                "Ignoring asset {} with base price {} above {}",
                id, base_price, MAX_BASE_PRICE
            );
            return false;
        }

        match self.assets.entry(id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let now = self.clock.now();
                slot.insert(Arc::new(AssetState::seeded(
                    base_price,
                    now,
                    self.max_history_points,
                )));
                info!("Tracking asset {} at base price {}", id, base_price);
                true
            }
        }
    }

    /// Current offset of `id`, or zero if untracked
    pub fn current_percent(&self, id: &str) -> Percent {
        self.state(id)
            .map(|state| state.percent)
            .unwrap_or(Decimal::ZERO)
    }

    /// Price of `id` for the given base price
    ///
    /// Takes the base price from the caller so a price can be quoted before
    /// registration completes (offset zero in that case).
    pub fn current_price(&self, id: &str, base_price: Price) -> Price {
        compute_price(base_price, self.current_percent(id))
    }

    /// Snapshot of the price history of `id`, empty if untracked
    pub fn history(&self, id: &str) -> Vec<PricePoint> {
        self.state(id)
            .map(|state| state.history.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Offset and history of `id`, both from the same tick
    pub fn snapshot(&self, id: &str) -> Option<AssetSnapshot> {
        self.state(id).map(|state| AssetSnapshot {
            id: id.to_string(),
            base_price: state.base_price,
            percent: state.percent,
            history: state.history.iter().copied().collect(),
        })
    }

    /// Base price `id` was registered with
    pub fn base_price(&self, id: &str) -> Option<Price> {
        self.state(id).map(|state| state.base_price)
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// Ids of all tracked assets, sorted
    pub fn tracked_ids(&self) -> Vec<AssetId> {
        let mut ids: Vec<AssetId> = self.assets.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Number of ticks that advanced at least one asset
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Name of the configured delta strategy
    pub fn strategy_name(&self) -> String {
        self.strategy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .name()
            .to_string()
    }

    /// Advance every tracked asset by one step
    ///
    /// All assets share one timestamp. Returns the number of assets advanced;
    /// with nothing tracked this is a no-op.
    pub fn tick(&self) -> usize {
        let mut strategy = self.strategy.lock().unwrap_or_else(PoisonError::into_inner);
        if self.assets.is_empty() {
            return 0;
        }

        let now = self.clock.now();
        let mut advanced = 0;
        for mut entry in self.assets.iter_mut() {
            let previous = entry.value().percent;
            let delta = strategy.next_delta(previous);
            let next = entry.value().advanced(delta, now, self.max_history_points);
            trace!(
                "Asset {}: {}% -> {}% (delta {})",
                entry.key(),
                previous,
                next.percent,
                delta
            );
            *entry.value_mut() = Arc::new(next);
            advanced += 1;
        }

        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Tick {} advanced {} assets at {}", tick, advanced, now);
        advanced
    }

    fn state(&self, id: &str) -> Option<Arc<AssetState>> {
        self.assets.get(id).map(|entry| Arc::clone(entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{RandomWalk, ScriptedDeltas};
    use chrono::{Duration, Utc};
    use nftrader_clock::WorldClock;
    use rust_decimal_macros::dec;

    fn engine_with(deltas: ScriptedDeltas) -> (EconomyEngine, Arc<WorldClock>) {
        let clock = WorldClock::fixed(Utc::now());
        let engine = EconomyEngine::new(Box::new(deltas), clock.clone());
        (engine, clock)
    }

    #[test]
    fn test_registration_seeds_history() {
        let (engine, clock) = engine_with(ScriptedDeltas::default());

        assert!(engine.ensure_tracked("x", dec!(75.255)));
        assert_eq!(engine.current_percent("x"), dec!(0));

        let history = engine.history("x");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, dec!(75.26));
        assert_eq!(history[0].timestamp, clock.now());
    }

    #[test]
    fn test_first_registration_wins() {
        let (engine, _) = engine_with(ScriptedDeltas::default());

        assert!(engine.ensure_tracked("x", dec!(100)));
        assert!(!engine.ensure_tracked("x", dec!(999)));

        assert_eq!(engine.current_price("x", dec!(100)), dec!(100.00));
        assert_eq!(engine.base_price("x"), Some(dec!(100)));
        assert_eq!(engine.history("x").len(), 1);
    }

    #[test]
    fn test_invalid_registrations_are_absorbed() {
        let (engine, _) = engine_with(ScriptedDeltas::default());

        assert!(!engine.ensure_tracked("", dec!(100)));
        assert!(!engine.ensure_tracked("neg", dec!(-1)));
        assert!(engine.is_empty());

        // Zero is a valid base price
        assert!(engine.ensure_tracked("free", dec!(0)));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_oversized_base_price_is_rejected() {
        let (engine, _) = engine_with(ScriptedDeltas::new([dec!(9.99)]));
        let huge = nftrader_core::coerce_amount("75000000000000000000000000000");

        assert!(!engine.ensure_tracked("big", huge));
        assert!(!engine.is_tracked("big"));
        // Quoting an unregistered oversized asset saturates instead of panicking
        assert_eq!(engine.current_price("big", huge), Decimal::MAX);

        assert!(engine.ensure_tracked("cap", MAX_BASE_PRICE));
        assert_eq!(engine.tick(), 1);
        assert_eq!(engine.current_percent("cap"), dec!(9.99));
    }

    #[test]
    fn test_extreme_offset_saturates_price() {
        let (engine, _) = engine_with(ScriptedDeltas::new([Decimal::from(u64::MAX)]));
        engine.ensure_tracked("cap", MAX_BASE_PRICE);

        assert_eq!(engine.tick(), 1);
        assert_eq!(engine.current_price("cap", MAX_BASE_PRICE), Decimal::MAX);
        assert_eq!(engine.history("cap").last().unwrap().price, Decimal::MAX);
    }

    #[test]
    fn test_untracked_defaults() {
        let (engine, _) = engine_with(ScriptedDeltas::default());

        assert_eq!(engine.current_percent("nope"), dec!(0));
        assert_eq!(engine.current_price("nope", dec!(123.456)), dec!(123.46));
        assert!(engine.history("nope").is_empty());
        assert!(engine.snapshot("nope").is_none());
        assert_eq!(engine.base_price("nope"), None);
    }

    #[test]
    fn test_tick_applies_cumulative_offset() {
        let (engine, _) = engine_with(ScriptedDeltas::new([dec!(10), dec!(-5.5)]));
        engine.ensure_tracked("x", dec!(200));

        assert_eq!(engine.tick(), 1);
        assert_eq!(engine.current_percent("x"), dec!(10));
        assert_eq!(engine.current_price("x", dec!(200)), dec!(220.00));

        engine.tick();
        assert_eq!(engine.current_percent("x"), dec!(4.5));
        assert_eq!(engine.current_price("x", dec!(200)), dec!(209.00));

        let prices: Vec<_> = engine.history("x").iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![dec!(200), dec!(220), dec!(209)]);
        assert_eq!(engine.ticks(), 2);
    }

    #[test]
    fn test_tick_without_assets_is_noop() {
        let (engine, _) = engine_with(ScriptedDeltas::new([dec!(3)]));
        assert_eq!(engine.tick(), 0);
        assert_eq!(engine.ticks(), 0);

        // The scripted delta was not consumed
        engine.ensure_tracked("x", dec!(100));
        engine.tick();
        assert_eq!(engine.current_percent("x"), dec!(3));
    }

    #[test]
    fn test_all_assets_share_tick_timestamp() {
        let (engine, clock) = engine_with(ScriptedDeltas::cycling([dec!(1)]));
        engine.ensure_tracked("a", dec!(10));
        engine.ensure_tracked("b", dec!(20));
        engine.ensure_tracked("c", dec!(30));

        clock.advance(Duration::seconds(10));
        assert_eq!(engine.tick(), 3);

        let stamps: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|id| engine.history(id).last().unwrap().timestamp)
            .collect();
        assert!(stamps.iter().all(|t| *t == clock.now()));
    }

    #[test]
    fn test_history_capped_fifo() {
        let (engine, clock) = engine_with(ScriptedDeltas::cycling([dec!(0.5)]));
        engine.ensure_tracked("x", dec!(100));

        let mut tick_times = Vec::new();
        for n in 1..=61 {
            clock.advance(Duration::seconds(10));
            engine.tick();
            tick_times.push(clock.now());
            assert_eq!(engine.history("x").len(), (n + 1).min(MAX_HISTORY_POINTS));
        }

        let history = engine.history("x");
        assert_eq!(history.len(), 60);
        // Oldest surviving sample was written by tick 2
        assert_eq!(history[0].timestamp, tick_times[1]);
        assert_eq!(history.last().unwrap().timestamp, tick_times[60]);
    }

    #[test]
    fn test_custom_history_limit() {
        let clock = WorldClock::fixed(Utc::now());
        let engine = EconomyEngine::new(Box::new(ScriptedDeltas::default()), clock)
            .with_history_limit(3);
        engine.ensure_tracked("x", dec!(1));
        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(engine.history("x").len(), 3);

        let clamped =
            EconomyEngine::new(Box::new(ScriptedDeltas::default()), WorldClock::fixed(Utc::now()))
                .with_history_limit(0);
        assert_eq!(clamped.history_limit(), 1);
    }

    #[test]
    fn test_snapshot_consistent() {
        let (engine, _) = engine_with(ScriptedDeltas::new([dec!(2.5)]));
        engine.ensure_tracked("x", dec!(80));
        engine.tick();

        let snapshot = engine.snapshot("x").unwrap();
        assert_eq!(snapshot.percent, dec!(2.5));
        assert_eq!(snapshot.current_price(), dec!(82.00));
        assert_eq!(snapshot.latest().unwrap().price, snapshot.current_price());
    }

    #[test]
    fn test_history_is_a_snapshot() {
        let (engine, _) = engine_with(ScriptedDeltas::cycling([dec!(1)]));
        engine.ensure_tracked("x", dec!(100));

        let before = engine.history("x");
        engine.tick();
        assert_eq!(before.len(), 1);
        assert_eq!(engine.history("x").len(), 2);
    }

    #[test]
    fn test_random_walk_unbounded_offsets() {
        let clock = WorldClock::fixed(Utc::now());
        let engine = EconomyEngine::new(Box::new(RandomWalk::with_seed(42)), clock);
        engine.ensure_tracked("x", dec!(100));

        for _ in 0..200 {
            let before = engine.current_percent("x");
            engine.tick();
            let step = engine.current_percent("x") - before;
            assert!(step >= dec!(-10) && step < dec!(10));
        }
        assert_eq!(engine.strategy_name(), "RandomWalk");
    }

    #[test]
    fn test_tracked_ids_sorted() {
        let (engine, _) = engine_with(ScriptedDeltas::default());
        engine.ensure_tracked("3", dec!(75.25));
        engine.ensure_tracked("1", dec!(120));
        engine.ensure_tracked("2", dec!(280.5));
        assert_eq!(engine.tracked_ids(), vec!["1", "2", "3"]);
        assert!(engine.is_tracked("2"));
    }
}
