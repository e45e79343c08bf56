//! NFT Trader Runner - Offline Market Demo
//!
//! Wires the whole workspace together for a timed run:
//!
//! - **Config**: `NFTRADER_*` environment variables or a JSON file
//! - **Bootstrap**: catalog loading, economy start, in-memory adapters
//! - **Simulation**: a demo trader buying and selling while prices move
//!
//! ## Architecture
//!
//! ```text
//!   RunnerConfig ──► MarketBootstrap
//!                      │
//!        ┌─────────────┼──────────────────┐
//!        ▼             ▼                  ▼
//!   ┌─────────┐  ┌───────────┐     ┌─────────────┐
//!   │ Catalog │  │  Economy  │◄────│  TradeDesk  │◄── demo trader
//!   │ (rows)  │  │ (ticker)  │price│ (wallet,    │    (MarketSimulation)
//!   └─────────┘  └───────────┘     │  purchases) │
//!                                  └─────────────┘
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod simulation;

// Re-export main types
pub use bootstrap::{MarketBootstrap, load_catalog};
pub use config::{ConfigError, DataServiceConfig, RunnerConfig};
pub use error::{Result, RunnerError};
pub use simulation::{
    AssetSummary, MarketSimulation, SimulationConfig, SimulationResults, TradeRecord, TradeSide,
};
