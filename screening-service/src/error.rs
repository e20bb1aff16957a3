use thiserror::Error;

/// Screening failures surfaced to callers
#[derive(Error, Debug)]
pub enum Error {
    /// The restricted-party list has never been loaded. A scan without the
    /// list must fail loudly rather than report a fabricated clear.
    #[error("restricted-party list not loaded")]
    ListUnavailable,

    #[error("invalid screening query: {0}")]
    InvalidQuery(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
