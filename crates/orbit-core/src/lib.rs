//! Orbit Core
//!
//! Core types for the Orbit view router.
//!
//! This crate provides:
//! - Route templates and location parsing ([`RoutePattern`], [`Location`])
//! - The smuggled navigation payload ([`Payload`])
//! - View-model declarations and DOM binding selectors ([`ViewModelSpec`], [`BindingSelector`])
//! - Router configuration ([`RouterConfig`])

pub mod config;
pub mod error;
pub mod payload;
pub mod route;
pub mod view;

pub use config::RouterConfig;
pub use error::{Error, Result};
pub use payload::Payload;
pub use route::{Location, RoutePattern};
pub use view::{BindingSelector, ViewModelSpec};

/// Default event channel name
pub const DEFAULT_CHANNEL: &str = "orbit";

/// Default directory view-model modules are loaded from
pub const DEFAULT_VIEWMODEL_DIRECTORY: &str = "/app/viewmodel";

/// Default directory view templates are fetched from
pub const DEFAULT_VIEW_DIRECTORY: &str = "/app/view";
