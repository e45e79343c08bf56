//! NFT Trader Economy
//!
//! Simulates a market for catalog assets. Every tracked asset carries a
//! cumulative percentage offset that moves on each tick; its price is the
//! base price adjusted by that offset.
//!
//! - **Engine**: per-asset offset and bounded price history, snapshot reads
//! - **Strategies**: pluggable per-tick delta rules (random walk, scripted,
//!   mean-reverting, bounded)
//! - **Ticker**: the engine's own recurring timer, stopped on shutdown
//!
//! ## Architecture
//!
//! ```text
//!   Catalog ──► ensure_tracked(id, base)
//!                     │
//!                     ▼
//!        ┌───────────────────────────┐       ┌──────────────┐
//!        │      EconomyEngine        │◄──────│ DeltaStrategy│
//!        │  id ─► Arc<AssetState>    │ delta └──────────────┘
//!        │   (percent, history[60])  │
//!        └─────────────┬─────────────┘
//!              ▲       │ current_price / current_percent / history
//!        tick()│       ▼
//!        ┌─────┴────┐  Presentation, TradeDesk (pull-based)
//!        │  Ticker  │
//!        └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nftrader_economy::{Economy, EconomyConfig};
//!
//! let economy = Economy::start(EconomyConfig::default(), clock)?;
//! economy.engine().ensure_tracked("1", dec!(120));
//! let price = economy.engine().current_price("1", dec!(120));
//! economy.shutdown();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod strategy;
pub mod ticker;

// Re-export main types
pub use config::{DEFAULT_BAND, DEFAULT_REVERSION, EconomyConfig, StrategyKind};
pub use engine::{AssetSnapshot, EconomyEngine, MAX_HISTORY_POINTS};
pub use error::{EconomyError, Result};
pub use strategy::{
    BoundedWalk, DEFAULT_AMPLITUDE, MAX_AMPLITUDE, MeanReverting, RandomWalk, ScriptedDeltas,
};
pub use ticker::{Economy, Ticker};
