//! Error types for ownership discovery

use thiserror::Error;

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Discovery errors
#[derive(Error, Debug)]
pub enum Error {
    /// The run was cancelled before it could complete
    #[error("Discovery run cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Metrics registration failure
    #[error("Metrics error: {0}")]
    Metrics(String),
}
