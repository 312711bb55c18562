//! Error types for the shopharvest crate

use thiserror::Error;

/// Result type for shopharvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for shopharvest operations
#[derive(Debug, Error)]
pub enum Error {
    /// Rendering session error
    #[error("Session error: {0}")]
    Session(String),

    /// A product element could not be turned into a record
    #[error("Extraction error: {0}")]
    Extract(String),

    /// Category processing error (navigation, timeout)
    #[error("Harvest error: {0}")]
    Harvest(String),

    /// Output file error
    #[error("Output error: {0}")]
    Output(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
