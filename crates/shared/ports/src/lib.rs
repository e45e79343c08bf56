//! NFT Trader Ports
//!
//! Port definitions (traits) for the NFT trading simulation.
//! These define the boundaries between domain logic and infrastructure:
//! time, price-walk strategies, and the hosted data service (catalog,
//! identity, wallets, purchases).

mod catalog;
mod clock;
mod error;
mod identity;
mod purchases;
mod strategy;
mod wallet;

pub use catalog::AssetCatalog;
pub use clock::Clock;
pub use error::{PortError, PortResult};
pub use identity::IdentityProvider;
pub use purchases::PurchaseStore;
pub use strategy::DeltaStrategy;
pub use wallet::WalletStore;
