//! Host error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    #[error("fetch failed for `{path}`: {reason}")]
    Fetch { path: String, reason: String },

    #[error("host error: {0}")]
    Other(String),
}
