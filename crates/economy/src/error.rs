//! Economy errors
//!
//! The engine itself never fails; only setup can.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    #[error("Invalid economy configuration: {0}")]
    InvalidConfig(String),

    #[error("The economy ticker needs a running tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, EconomyError>;
