//! NFT Trader Trading Workflow
//!
//! Everything between a user's click and the hosted data service:
//! - **Wallets**: starting balance, positive-amount and no-overdraft rules
//! - **Trade desk**: buy/sell at the engine's current price, with a
//!   compensating ledger entry when the ownership write fails
//! - **Portfolio**: unsold purchases with current estimate and trend
//! - **Catalog**: loosely-typed catalog rows, tracking assets in the engine
//! - **In-memory adapters** for every port (tests and offline runs)
//!
//! ## Buy flow
//!
//! ```text
//! current_user ─► get_asset ─► ensure_tracked ─► duplicate check
//!                                                      │
//!          ┌───────────────────────────────────────────┘
//!          ▼
//!   current_price ─► debit ─► insert purchase ──ok──► receipt
//!                                   │
//!                                 error
//!                                   ▼
//!                          compensating credit ──error──► CompensationFailed
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let desk = TradeDesk::new(engine, catalog, identity, wallets, purchases, clock);
//! let receipt = desk.buy("2").await?;
//! desk.sell(receipt.purchase.id).await?;
//! ```

pub mod catalog;
pub mod desk;
pub mod error;
pub mod memory;
pub mod portfolio;
pub mod wallet;

// Re-export main types
pub use catalog::{CatalogRow, parse_catalog, sample_assets, track_catalog};
pub use desk::{Quote, TradeDesk, TradeReceipt};
pub use error::{Result, TradeError};
pub use memory::{InMemoryCatalog, InMemoryPurchaseStore, InMemoryWalletStore, StaticIdentity};
pub use portfolio::Holding;
pub use wallet::WalletService;
