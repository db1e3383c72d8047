//! Error types for Orbit core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Error, Debug)]
pub enum Error {
    /// Route template could not be parsed
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Location path could not be parsed
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// DOM binding selector could not be parsed
    #[error("invalid binding selector: {0}")]
    InvalidSelector(String),
}
