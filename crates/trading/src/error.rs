//! Trading errors

use nftrader_core::{AssetId, Price, PurchaseId, UserId};
use nftrader_ports::PortError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("You must be signed in")]
    NotSignedIn,

    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),

    #[error("Unknown purchase: {0}")]
    UnknownPurchase(PurchaseId),

    #[error("No wallet for user {0}")]
    WalletMissing(UserId),

    #[error("Asset {0} is already owned")]
    AlreadyOwned(AssetId),

    #[error("Not owned by the current user: {0}")]
    NotOwned(String),

    #[error("Purchase {0} was already sold")]
    AlreadySold(PurchaseId),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Price),

    #[error("Insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds { balance: Price, required: Price },

    #[error("Data service error: {0}")]
    Port(#[from] PortError),

    #[error(
        "Compensation of {amount} for {user_id} failed after {original}: {compensation}"
    )]
    CompensationFailed {
        user_id: UserId,
        amount: Price,
        original: PortError,
        compensation: Box<TradeError>,
    },
}

impl TradeError {
    /// Whether the ledger may now disagree with ownership records
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, TradeError::CompensationFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, TradeError>;
