use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value in euros - uses Decimal for precision
pub type Price = Decimal;

/// Percentage offset (e.g. `12.5` means +12.5%)
pub type Percent = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Stable, opaque identifier of a catalog asset
pub type AssetId = String;

/// Identifier of an authenticated user, as issued by the identity provider
pub type UserId = String;
