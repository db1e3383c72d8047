//! Location transitions
//!
//! The navigator resolves a navigation target against the route table,
//! stores an explicit payload if one was supplied (replacing the smuggled
//! payload wholesale, unlike the scanner's merge), and pushes the new
//! location into the browsing history without reloading. The caller is
//! expected to trigger a scan afterwards so the location takes effect.

use orbit_core::Payload;
use orbit_host::History;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, RouterError};
use crate::registry::{RouteMatch, RouteTable};

/// A navigation request: a bare location, or a structured request with an
/// optional payload.
#[derive(Debug, Clone)]
pub enum NavigationRequest {
    Location(String),
    Detailed {
        location: Option<String>,
        payload: Option<Payload>,
    },
}

impl NavigationRequest {
    pub fn to(location: impl Into<String>) -> Self {
        Self::Location(location.into())
    }

    pub fn with_payload(location: impl Into<String>, payload: Payload) -> Self {
        Self::Detailed {
            location: Some(location.into()),
            payload: Some(payload),
        }
    }
}

impl From<&str> for NavigationRequest {
    fn from(location: &str) -> Self {
        Self::Location(location.to_string())
    }
}

impl From<String> for NavigationRequest {
    fn from(location: String) -> Self {
        Self::Location(location)
    }
}

/// Performs location transitions against the route table and history
pub struct Navigator {
    table: Arc<RouteTable>,
    history: Arc<dyn History>,
    allow_unmatched: bool,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, history: Arc<dyn History>, allow_unmatched: bool) -> Self {
        Self {
            table,
            history,
            allow_unmatched,
        }
    }

    /// Resolve the target, store the payload, push the location.
    ///
    /// A structured request without a location fails with `MissingLocation`.
    /// A target no route matches fails with `RouteNotFound` unless the
    /// router was configured to allow unmatched navigation, in which case
    /// `Ok(None)` is returned and the location is still pushed.
    pub fn navigate(&self, request: NavigationRequest) -> Result<Option<RouteMatch>> {
        let (location, payload) = match request {
            NavigationRequest::Location(location) => (location, None),
            NavigationRequest::Detailed { location, payload } => {
                (location.ok_or(RouterError::MissingLocation)?, payload)
            }
        };

        let matched = self.table.find_matching(&location);
        if matched.is_none() && !self.allow_unmatched {
            return Err(RouterError::RouteNotFound(location));
        }

        if let Some(payload) = payload {
            self.table.replace_payload(payload);
        }

        debug!(location = %location, "pushing location");
        self.history.push(&location);

        Ok(matched)
    }
}
