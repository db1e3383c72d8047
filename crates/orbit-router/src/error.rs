//! Router error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {
    /// Update or navigation referenced a pattern no route carries
    #[error("no route registered for pattern `{0}`")]
    RouteNotFound(String),

    /// A structured navigation request carried no location
    #[error("navigation request is missing a location")]
    MissingLocation,

    /// The module loader could not resolve a view-model id
    #[error("unable to resolve view model `{0}`")]
    MissingViewModel(String),

    /// A binding target resolved to zero DOM elements
    #[error("no DOM element matches `{selector}` for view model `{view_id}`")]
    MissingDomElement { view_id: String, selector: String },

    /// A template fetch came back with a non-success status
    #[error("template fetch for `{path}` returned status {status}")]
    TemplateFetch { path: String, status: u16 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("host error: {0}")]
    Host(#[from] orbit_host::HostError),

    #[error("core error: {0}")]
    Core(#[from] orbit_core::Error),
}
