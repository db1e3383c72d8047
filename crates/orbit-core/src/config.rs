//! Router configuration

use crate::{DEFAULT_CHANNEL, DEFAULT_VIEWMODEL_DIRECTORY, DEFAULT_VIEW_DIRECTORY};

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Event channel namespace
    pub channel: String,
    /// Directory view-model modules are loaded from
    pub viewmodel_directory: String,
    /// Directory view templates are fetched from
    pub view_directory: String,
    /// Allow `navigate` to a location no registered route matches.
    /// Off by default: unmatched navigation fails with `RouteNotFound`.
    pub allow_unmatched_navigation: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            viewmodel_directory: DEFAULT_VIEWMODEL_DIRECTORY.to_string(),
            view_directory: DEFAULT_VIEW_DIRECTORY.to_string(),
            allow_unmatched_navigation: false,
        }
    }
}
