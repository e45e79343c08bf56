//! Runner errors

use nftrader_economy::EconomyError;
use nftrader_trading::TradeError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Economy(#[from] EconomyError),

    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error("Failed to load catalog: {0}")]
    Catalog(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
