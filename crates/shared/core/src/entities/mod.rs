mod asset;
mod price_point;
mod purchase;
mod trend;

pub use asset::Asset;
pub use price_point::PricePoint;
pub use purchase::{Purchase, PurchaseId};
pub use trend::{Sparkline, Trend};
