//! NFT Trader Core Domain
//!
//! Pure domain types for the NFT trading simulation.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod pricing;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Catalog
    Asset,
    // Simulation output
    PricePoint,
    // Ownership records
    Purchase,
    PurchaseId,
    Sparkline,
    Trend,
};
pub use pricing::{
    coerce_amount, coerce_f64, compute_price, compute_price_lossy, round2, MAX_BASE_PRICE,
    STARTING_BALANCE,
};
pub use values::{AssetId, Percent, Price, Timestamp, UserId};
