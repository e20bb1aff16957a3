//! Error types for the graph store

use thiserror::Error;

/// Result type for graph store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Graph store errors
#[derive(Error, Debug)]
pub enum Error {
    /// Cache backend failure
    #[error("Cache error: {0}")]
    Cache(String),

    /// Artifact serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}
