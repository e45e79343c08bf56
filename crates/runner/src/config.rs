//! Runner configuration
//!
//! Loaded from `NFTRADER_*` environment variables or from a JSON file. Every
//! field has a default, so an empty environment or `{}` is a valid
//! configuration that runs the demo offline.

use nftrader_economy::{EconomyConfig, EconomyError, StrategyKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::simulation::SimulationConfig;

pub const ENV_TICK_INTERVAL_MS: &str = "NFTRADER_TICK_INTERVAL_MS";
pub const ENV_HISTORY_POINTS: &str = "NFTRADER_HISTORY_POINTS";
pub const ENV_STRATEGY: &str = "NFTRADER_STRATEGY";
pub const ENV_SEED: &str = "NFTRADER_SEED";
pub const ENV_RUN_FOR_SECS: &str = "NFTRADER_RUN_FOR_SECS";
pub const ENV_DEMO_USER: &str = "NFTRADER_DEMO_USER";
pub const ENV_CATALOG: &str = "NFTRADER_CATALOG";
pub const ENV_DATA_URL: &str = "NFTRADER_DATA_URL";
pub const ENV_DATA_KEY: &str = "NFTRADER_DATA_KEY";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidVar { name: String, value: String },

    #[error("Data service is not configured. Set NFTRADER_DATA_URL and NFTRADER_DATA_KEY")]
    DataServiceMissing,

    #[error("Invalid data service URL {0:?}: use the http(s) project URL, not a database connection string")]
    DataServiceUrl(String),

    #[error("Invalid economy config: {0}")]
    Economy(#[from] EconomyError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Connection settings for the hosted data service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataServiceConfig {
    pub url: Option<String>,
    pub key: Option<String>,
}

impl DataServiceConfig {
    /// Both values present
    pub fn is_set(&self) -> bool {
        non_empty(&self.url).is_some() && non_empty(&self.key).is_some()
    }

    /// Both values present and the URL is an http(s) URL
    pub fn validate(&self) -> Result<()> {
        let (Some(url), Some(_)) = (non_empty(&self.url), non_empty(&self.key)) else {
            return Err(ConfigError::DataServiceMissing);
        };

        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::DataServiceUrl(url.to_string()))
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Everything the runner binary needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub economy: EconomyConfig,
    /// How long the demo runs (seconds)
    pub run_for_secs: u64,
    /// User the demo signs in as
    pub demo_user: String,
    /// Ticks to watch before the demo buys
    pub buy_after_ticks: u64,
    /// Optional JSON catalog; the built-in sample catalog otherwise
    pub catalog_path: Option<String>,
    /// Hosted data service; absent means offline
    pub data_service: Option<DataServiceConfig>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            economy: EconomyConfig::default(),
            run_for_secs: 30,
            demo_user: "demo-user".to_string(),
            buy_after_ticks: 1,
            catalog_path: None,
            data_service: None,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64>(&lookup, ENV_TICK_INTERVAL_MS)? {
            config.economy.tick_interval_ms = ms;
        }
        if let Some(points) = parse_var::<usize>(&lookup, ENV_HISTORY_POINTS)? {
            config.economy.max_history_points = points;
        }
        if let Some(name) = lookup(ENV_STRATEGY) {
            config.economy.strategy =
                StrategyKind::named(&name).ok_or_else(|| ConfigError::InvalidVar {
                    name: ENV_STRATEGY.to_string(),
                    value: name.clone(),
                })?;
        }
        // After the strategy, so the seed lands on the chosen one
        if let Some(seed) = parse_var::<u64>(&lookup, ENV_SEED)? {
            config.economy = config.economy.with_seed(seed);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_RUN_FOR_SECS)? {
            config.run_for_secs = secs;
        }
        if let Some(user) = lookup(ENV_DEMO_USER).filter(|u| !u.trim().is_empty()) {
            config.demo_user = user;
        }
        config.catalog_path = lookup(ENV_CATALOG).filter(|p| !p.trim().is_empty());

        let url = lookup(ENV_DATA_URL);
        let key = lookup(ENV_DATA_KEY);
        if url.is_some() || key.is_some() {
            config.data_service = Some(DataServiceConfig { url, key });
        }

        Ok(config)
    }

    /// Check the economy settings and, if present, the data service settings
    pub fn validate(&self) -> Result<()> {
        self.economy.validate()?;
        if let Some(data_service) = &self.data_service {
            data_service.validate()?;
        }
        Ok(())
    }

    /// Whether the runner uses in-memory adapters
    pub fn is_offline(&self) -> bool {
        self.data_service.is_none()
    }

    pub fn run_for(&self) -> Duration {
        Duration::from_secs(self.run_for_secs)
    }

    /// Settings for the demo simulation
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            economy: self.economy.clone(),
            duration: self.run_for(),
            demo_user: self.demo_user.clone(),
            buy_after_ticks: self.buy_after_ticks,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar {
                name: name.to_string(),
                value: raw,
            }),
    }
}
