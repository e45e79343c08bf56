use thiserror::Error;

/// Errors reported by external collaborators (hosted data service)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Data service is not configured: {0}")]
    NotConfigured(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Data service unavailable: {0}")]
    Unavailable(String),

    #[error("Data service rejected the request: {0}")]
    Rejected(String),
}

pub type PortResult<T> = std::result::Result<T, PortError>;
