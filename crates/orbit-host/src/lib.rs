//! Orbit Host
//!
//! Host-environment abstractions for the Orbit view router. The router core
//! never touches a real DOM, network, or module system; it talks to these
//! traits instead:
//!
//! - [`DomAdapter`]: element lookup, visibility, markup injection
//! - [`ModuleLoader`]: fetches view-model declarations by path
//! - [`TemplateFetcher`]: fetches template markup
//! - [`BindingEngine`]: attaches live data binding to an element
//! - [`History`]: the browsing history surface (pushState, current path)
//!
//! A browser host implements these against the real DOM; tests implement
//! them in memory (see `orbit-testkit`).

pub mod error;
pub mod traits;

pub use error::{HostError, Result};
pub use traits::{
    BindingEngine, DomAdapter, ElementHandle, History, ModuleLoader, TemplateFetcher,
    TemplateResponse,
};
