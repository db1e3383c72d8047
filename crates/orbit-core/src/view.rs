//! View-model declarations and DOM binding selectors

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What a view-model module declares about itself.
///
/// The federation turns a spec into its canonical runtime record when the
/// view model joins; declared children are joined alongside their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModelSpec {
    /// Unique view-model id
    pub id: String,
    /// DOM binding target: `#id`, `.class`, or a bare element id
    #[serde(rename = "domBindingId")]
    pub dom_binding_id: String,
    /// Template resource path, relative to the view directory
    #[serde(rename = "templatePath")]
    pub template_path: String,
    /// Views flagged `autoRender` are never hidden by other renders
    #[serde(rename = "autoRender", default)]
    pub auto_render: bool,
    /// Declared child view models
    #[serde(default)]
    pub children: Vec<ViewModelSpec>,
}

impl ViewModelSpec {
    pub fn new(
        id: impl Into<String>,
        dom_binding_id: impl Into<String>,
        template_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            dom_binding_id: dom_binding_id.into(),
            template_path: template_path.into(),
            auto_render: false,
            children: Vec::new(),
        }
    }

    /// Flag this view to render on its own, exempt from hiding
    pub fn auto_render(mut self, auto_render: bool) -> Self {
        self.auto_render = auto_render;
        self
    }

    /// Declare a child view model
    pub fn child(mut self, child: ViewModelSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// A parsed DOM binding target.
///
/// A leading `.` selects by class, a leading `#` or a bare name selects by
/// element id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingSelector {
    Id(String),
    Class(String),
}

impl BindingSelector {
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidSelector("empty selector".to_string()));
        }

        if let Some(class) = s.strip_prefix('.') {
            if class.is_empty() {
                return Err(Error::InvalidSelector(s.to_string()));
            }
            return Ok(Self::Class(class.to_string()));
        }

        let id = s.strip_prefix('#').unwrap_or(s);
        if id.is_empty() {
            return Err(Error::InvalidSelector(s.to_string()));
        }
        Ok(Self::Id(id.to_string()))
    }
}

impl std::fmt::Display for BindingSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{}", id),
            Self::Class(class) => write!(f, ".{}", class),
        }
    }
}

impl TryFrom<&str> for BindingSelector {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        BindingSelector::parse(s)
    }
}
