//! Host trait definitions

use async_trait::async_trait;
use orbit_core::{BindingSelector, ViewModelSpec};

use crate::error::Result;

/// An opaque handle identifying a DOM element to the host adapter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a template fetch
#[derive(Debug, Clone)]
pub struct TemplateResponse {
    /// HTTP-style status code
    pub status: u16,
    /// Template markup
    pub body: String,
}

impl TemplateResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 and 302 count as success
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 302)
    }
}

/// DOM element lookup and mutation
pub trait DomAdapter: Send + Sync {
    /// Return all elements matching a binding selector. May be empty; the
    /// router converts an empty result into `MissingDomElement`.
    fn select(&self, selector: &BindingSelector) -> Vec<ElementHandle>;

    /// Show or hide an element
    fn set_visible(&self, element: &ElementHandle, visible: bool);

    /// Replace an element's markup
    fn inject_html(&self, element: &ElementHandle, html: &str);
}

/// Fetches view-model declarations by module path
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self, path: &str) -> Result<ViewModelSpec>;
}

/// Fetches template markup by resource path
#[async_trait]
pub trait TemplateFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<TemplateResponse>;
}

/// Attaches live data binding between a view model and a DOM element.
/// The router does not consume a return value.
pub trait BindingEngine: Send + Sync {
    fn bind(&self, view_id: &str, element: &ElementHandle);
}

/// The browsing history surface
pub trait History: Send + Sync {
    /// Push a new location without reloading
    fn push(&self, path: &str);

    /// The current location path
    fn current_path(&self) -> String;
}
