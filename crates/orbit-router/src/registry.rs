//! Route table and location scanner
//!
//! The table stores routes in registration order; when several routes
//! survive a scan (same module id, same arity, literals equal), they are
//! returned in registration order and the first survivor drives parameter
//! extraction. Registration order is the documented tie-break policy.

use orbit_core::{Location, Payload, RoutePattern};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{Result, RouterError};

/// Callback invoked when a scan matches the route
pub type RouteCallback = Arc<dyn Fn() + Send + Sync>;

/// A registered route
pub struct Route {
    pub pattern: RoutePattern,
    pub view_model_id: String,
    pub callback: Option<RouteCallback>,
}

/// A route that survived a scan
#[derive(Clone)]
pub struct RouteMatch {
    pub pattern: String,
    pub view_model_id: String,
    pub callback: Option<RouteCallback>,
}

impl RouteMatch {
    fn of(route: &Route) -> Self {
        Self {
            pattern: route.pattern.as_str().to_string(),
            view_model_id: route.view_model_id.clone(),
            callback: route.callback.clone(),
        }
    }
}

/// The route registry plus the smuggled payload it accumulates across scans
pub struct RouteTable {
    routes: RwLock<Vec<Route>>,
    payload: RwLock<Payload>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(Vec::new()),
            payload: RwLock::new(Payload::new()),
        }
    }

    /// Append a route. Duplicate patterns are allowed; earlier registrations
    /// win scans.
    pub fn add_route(
        &self,
        pattern: &str,
        view_model_id: &str,
        callback: Option<RouteCallback>,
    ) -> Result<()> {
        let pattern = RoutePattern::parse(pattern)?;
        self.routes.write().push(Route {
            pattern,
            view_model_id: view_model_id.to_string(),
            callback,
        });
        Ok(())
    }

    /// Attach a callback to the first route with an equal pattern.
    /// Fails with `RouteNotFound` when no such route exists.
    pub fn update_route(&self, pattern: &str, callback: RouteCallback) -> Result<()> {
        let pattern = RoutePattern::parse(pattern)?;
        let mut routes = self.routes.write();

        match routes.iter_mut().find(|r| r.pattern == pattern) {
            Some(route) => {
                route.callback = Some(callback);
                Ok(())
            }
            None => Err(RouterError::RouteNotFound(pattern.as_str().to_string())),
        }
    }

    /// Find the first route for a navigation target: exact pattern text
    /// first, then pattern-match against the target as a location (so
    /// `user/7` resolves the `user/:id` route).
    pub fn find_matching(&self, target: &str) -> Option<RouteMatch> {
        let routes = self.routes.read();
        let normalized = target.trim_matches('/');

        if let Some(route) = routes.iter().find(|r| r.pattern.as_str() == normalized) {
            return Some(RouteMatch::of(route));
        }

        let location = Location::parse(target).ok()?;
        routes
            .iter()
            .find(|r| r.pattern.matches(&location))
            .map(RouteMatch::of)
    }

    /// Scan a location path against the registry.
    ///
    /// Routes are filtered to those sharing the module id (first segment),
    /// then to those with the exact segment count, then to those whose
    /// literal segments all match. The first survivor's `:param` segments
    /// are extracted and merged into the smuggled payload, overwriting on
    /// key collision. Survivors are returned in registration order.
    pub fn scan_path(&self, path: &str) -> Vec<RouteMatch> {
        let location = match Location::parse(path) {
            Ok(location) => location,
            Err(_) => return Vec::new(),
        };

        let routes = self.routes.read();
        let survivors: Vec<&Route> = routes
            .iter()
            .filter(|r| r.pattern.module() == location.module())
            .filter(|r| r.pattern.segment_count() == location.segment_count())
            .filter(|r| r.pattern.matches(&location))
            .collect();

        if let Some(first) = survivors.first() {
            let extracted = first.pattern.extract(&location);
            if !extracted.is_empty() {
                self.payload.write().merge(&extracted);
            }
        }

        survivors.into_iter().map(RouteMatch::of).collect()
    }

    /// Snapshot of the smuggled payload
    pub fn payload(&self) -> Payload {
        self.payload.read().clone()
    }

    /// Replace the smuggled payload wholesale (explicit navigation payload)
    pub fn replace_payload(&self, payload: Payload) {
        *self.payload.write() = payload;
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
