//! Catalog rows and asset tracking
//!
//! Rows come from the hosted database with loosely typed columns: ids may
//! be numbers or strings and `base_price` may arrive as a JSON number or a
//! numeric string. Anything non-numeric prices at zero.

use chrono::{Duration, TimeZone, Utc};
use log::info;
use nftrader_core::{Asset, Timestamp, coerce_amount};
use nftrader_economy::EconomyEngine;
use nftrader_ports::AssetCatalog;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// One row of the catalog table
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_price: Value,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl From<CatalogRow> for Asset {
    fn from(row: CatalogRow) -> Self {
        let base_price = match &row.base_price {
            Value::Number(n) => coerce_amount(&n.to_string()),
            Value::String(s) => coerce_amount(s),
            _ => Default::default(),
        };

        Asset {
            id: value_to_id(&row.id),
            name: row.name,
            base_price,
            image_url: row.image_url,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}

fn value_to_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a JSON array of catalog rows
pub fn parse_catalog(json: &str) -> std::result::Result<Vec<Asset>, serde_json::Error> {
    let rows: Vec<CatalogRow> = serde_json::from_str(json)?;
    Ok(rows.into_iter().map(Asset::from).collect())
}

/// The built-in sample catalog
pub fn sample_assets() -> Vec<Asset> {
    let listed = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    vec![
        Asset::new("1", "CryptoCat #1", dec!(120.0)).with_created_at(listed),
        Asset::new("2", "PixelPunk #42", dec!(280.5))
            .with_created_at(listed + Duration::minutes(1)),
        Asset::new("3", "Abstract Ape #7", dec!(75.25))
            .with_created_at(listed + Duration::minutes(2)),
    ]
}

/// Start tracking every listed asset; returns the listing
pub async fn track_catalog(
    catalog: &dyn AssetCatalog,
    engine: &EconomyEngine,
) -> Result<Vec<Asset>> {
    let assets = catalog.list_assets().await?;
    let registered = assets
        .iter()
        .filter(|asset| engine.ensure_tracked(&asset.id, asset.base_price))
        .count();
    info!(
        "Catalog sync: {} assets listed, {} newly tracked",
        assets.len(),
        registered
    );
    Ok(assets)
}
