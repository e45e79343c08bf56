//! Ticker - the engine's recurring timer
//!
//! One tokio task per economy drives `EconomyEngine::tick` on a fixed
//! period. Missed periods are skipped rather than replayed, so ticks never
//! pile up behind a stalled runtime.

use log::{debug, info};
use nftrader_ports::{Clock, DeltaStrategy};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::config::EconomyConfig;
use crate::engine::EconomyEngine;
use crate::error::{EconomyError, Result};

/// Handle to a running tick loop
///
/// Stopping is idempotent; dropping the handle stops the loop.
pub struct Ticker {
    handle: Mutex<Option<JoinHandle<()>>>,
    period: Duration,
}

impl Ticker {
    /// Spawn a tick loop for `engine` on the current tokio runtime
    ///
    /// The first tick fires one full `period` after spawning.
    pub fn spawn(engine: Arc<EconomyEngine>, period: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| EconomyError::NoRuntime)?;

        info!("Starting economy ticker with interval of {:?}", period);
        let handle = runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticks.tick().await;
                let advanced = engine.tick();
                debug!("Economy tick advanced {} assets", advanced);
            }
        });

        Ok(Self {
            handle: Mutex::new(Some(handle)),
            period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the loop is still scheduled
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the loop; returns `true` only for the call that stopped it
    pub fn stop(&self) -> bool {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => {
                handle.abort();
                info!("Economy ticker stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A running economy: an engine plus the ticker that owns its schedule
///
/// Started on construction, stopped by [`Economy::shutdown`] or on drop.
/// Each instance is independent; nothing is shared between economies.
pub struct Economy {
    engine: Arc<EconomyEngine>,
    ticker: Ticker,
    config: EconomyConfig,
}

impl Economy {
    /// Start an economy with the strategy named in `config`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: EconomyConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let engine = Arc::new(EconomyEngine::from_config(&config, clock));
        Self::with_engine(config, engine)
    }

    /// Start an economy with an explicit strategy (e.g. a scripted fixture)
    pub fn start_with_strategy(
        config: EconomyConfig,
        strategy: Box<dyn DeltaStrategy>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let engine = Arc::new(
            EconomyEngine::new(strategy, clock).with_history_limit(config.max_history_points),
        );
        Self::with_engine(config, engine)
    }

    fn with_engine(config: EconomyConfig, engine: Arc<EconomyEngine>) -> Result<Self> {
        let ticker = Ticker::spawn(engine.clone(), config.tick_interval())?;
        info!(
            "Economy started: strategy={}, history={} points",
            engine.strategy_name(),
            engine.history_limit()
        );
        Ok(Self {
            engine,
            ticker,
            config,
        })
    }

    /// The engine; clone the `Arc` to share it with readers
    pub fn engine(&self) -> &Arc<EconomyEngine> {
        &self.engine
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Stop ticking. Safe to call any number of times.
    ///
    /// The engine stays readable; prices freeze at their last tick.
    pub fn shutdown(&self) {
        if self.ticker.stop() {
            info!("Economy shut down after {} ticks", self.engine.ticks());
        }
    }
}
