//! Router facade
//!
//! Wires the route table, federation, pipeline, and event channel over the
//! host traits, and exposes the public surface: fluent route registration,
//! static (black hole) views, `scan`, `navigate`, and `render`.

use orbit_core::{Payload, RouterConfig, ViewModelSpec};
use orbit_host::{BindingEngine, DomAdapter, History, ModuleLoader, TemplateFetcher};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use crate::channel::Channel;
use crate::error::{Result, RouterError};
use crate::federation::{Federation, JoinOutcome};
use crate::navigator::{NavigationRequest, Navigator};
use crate::pipeline::{default_fault_hook, FaultHook, Pipeline};
use crate::registry::{RouteCallback, RouteTable};

/// The Orbit view router
pub struct Router {
    config: RouterConfig,
    table: Arc<RouteTable>,
    federation: Arc<Federation>,
    pipeline: Arc<Pipeline>,
    navigator: Navigator,
    channel: Arc<Channel>,
    history: Arc<dyn History>,
    /// Static views rendered on every scan, in registration order
    black_holes: RwLock<Vec<String>>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The lifecycle event channel
    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    /// The view federation registry
    pub fn federation(&self) -> &Arc<Federation> {
        &self.federation
    }

    /// Snapshot of the smuggled payload
    pub fn payload(&self) -> Payload {
        self.table.payload()
    }

    /// Begin fluent route registration:
    /// `router.route("user/:id").to("userVM")?.then(callback)?`
    pub fn route<'a>(&'a self, pattern: &str) -> RouteBinder<'a> {
        RouteBinder {
            router: self,
            pattern: pattern.to_string(),
        }
    }

    /// Append a route directly
    pub fn add_route(
        &self,
        pattern: &str,
        view_model_id: &str,
        callback: Option<RouteCallback>,
    ) -> Result<()> {
        self.table.add_route(pattern, view_model_id, callback)
    }

    /// Attach a callback to an existing route
    pub fn update_route(&self, pattern: &str, callback: RouteCallback) -> Result<()> {
        self.table.update_route(pattern, callback)
    }

    /// Declare a static (black hole) view: rendered unconditionally on
    /// every scan, independent of route matches.
    pub fn static_view(&self, view_model_id: &str) {
        self.black_holes.write().push(view_model_id.to_string());
    }

    /// Join a view model into the federation ahead of rendering
    pub fn join(&self, spec: &ViewModelSpec) -> Result<JoinOutcome> {
        self.federation.join(spec)
    }

    /// Render a view model. Pipeline failures are reported through the
    /// fault hook and do not propagate.
    pub async fn render(&self, view_model_id: &str, payload: Option<Payload>) {
        self.pipeline.render(view_model_id, payload).await;
    }

    /// Render a view model by id with no payload
    pub async fn show(&self, view_model_id: &str) {
        self.render(view_model_id, None).await;
    }

    /// Scan the current location: render every static view, then every
    /// matching route's view model with the smuggled payload.
    ///
    /// A match's callback fires right after its render is dispatched, not
    /// after the view is bound. `scan` itself returns once every dispatched
    /// render has completed, giving callers a quiescence point.
    pub async fn scan(&self) {
        let path = self.history.current_path();
        let matches = self.table.scan_path(&path);
        let payload = self.table.payload();

        debug!(path = %path, matches = matches.len(), "scanning location");

        let black_holes: Vec<String> = self.black_holes.read().clone();
        for view_id in &black_holes {
            self.pipeline.render(view_id, None).await;
        }

        for route_match in &matches {
            let pipeline = Arc::clone(&self.pipeline);
            let view_id = route_match.view_model_id.clone();
            let payload = payload.clone();
            let render = tokio::spawn(async move {
                pipeline.render(&view_id, Some(payload)).await;
            });

            // Fire-on-dispatch: the callback does not wait for the render
            if let Some(callback) = &route_match.callback {
                callback();
            }

            let _ = render.await;
        }
    }

    /// Perform a location transition and scan so the URL takes effect
    /// immediately. Setup errors (missing location, unknown route) surface
    /// synchronously; render failures do not.
    pub async fn navigate(&self, request: impl Into<NavigationRequest>) -> Result<()> {
        let matched = self.navigator.navigate(request.into())?;
        if let Some(route_match) = &matched {
            info!(pattern = %route_match.pattern, view = %route_match.view_model_id, "navigating");
        }
        self.scan().await;
        Ok(())
    }
}

/// Fluent route registration, step one: bind a pattern to a view model
pub struct RouteBinder<'a> {
    router: &'a Router,
    pattern: String,
}

impl<'a> RouteBinder<'a> {
    pub fn to(self, view_model_id: &str) -> Result<BoundRoute<'a>> {
        self.router.add_route(&self.pattern, view_model_id, None)?;
        Ok(BoundRoute {
            router: self.router,
            pattern: self.pattern,
        })
    }
}

/// Fluent route registration, step two: optionally attach a callback
pub struct BoundRoute<'a> {
    router: &'a Router,
    pattern: String,
}

impl BoundRoute<'_> {
    pub fn then<F>(self, callback: F) -> Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.router
            .update_route(&self.pattern, Arc::new(callback))
    }
}

/// Builder assembling a router over its host environment
pub struct RouterBuilder {
    config: RouterConfig,
    dom: Option<Arc<dyn DomAdapter>>,
    loader: Option<Arc<dyn ModuleLoader>>,
    fetcher: Option<Arc<dyn TemplateFetcher>>,
    binder: Option<Arc<dyn BindingEngine>>,
    history: Option<Arc<dyn History>>,
    fault_hook: Option<FaultHook>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            dom: None,
            loader: None,
            fetcher: None,
            binder: None,
            history: None,
            fault_hook: None,
        }
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the event channel namespace
    pub fn channel_name(mut self, name: &str) -> Self {
        self.config.channel = name.to_string();
        self
    }

    pub fn viewmodel_directory(mut self, dir: &str) -> Self {
        self.config.viewmodel_directory = dir.to_string();
        self
    }

    pub fn view_directory(mut self, dir: &str) -> Self {
        self.config.view_directory = dir.to_string();
        self
    }

    /// Allow `navigate` to locations no route matches
    pub fn allow_unmatched_navigation(mut self, allow: bool) -> Self {
        self.config.allow_unmatched_navigation = allow;
        self
    }

    pub fn dom<D: DomAdapter + 'static>(mut self, dom: Arc<D>) -> Self {
        self.dom = Some(dom);
        self
    }

    pub fn module_loader<L: ModuleLoader + 'static>(mut self, loader: Arc<L>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn template_fetcher<T: TemplateFetcher + 'static>(mut self, fetcher: Arc<T>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn binding_engine<B: BindingEngine + 'static>(mut self, binder: Arc<B>) -> Self {
        self.binder = Some(binder);
        self
    }

    pub fn history<H: History + 'static>(mut self, history: Arc<H>) -> Self {
        self.history = Some(history);
        self
    }

    /// Replace the default log-and-continue fault hook
    pub fn fault_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &RouterError) + Send + Sync + 'static,
    {
        self.fault_hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<Router> {
        let dom = self
            .dom
            .ok_or_else(|| RouterError::Config("no DOM adapter configured".into()))?;
        let loader = self
            .loader
            .ok_or_else(|| RouterError::Config("no module loader configured".into()))?;
        let fetcher = self
            .fetcher
            .ok_or_else(|| RouterError::Config("no template fetcher configured".into()))?;
        let binder = self
            .binder
            .ok_or_else(|| RouterError::Config("no binding engine configured".into()))?;
        let history = self
            .history
            .ok_or_else(|| RouterError::Config("no history configured".into()))?;

        let config = self.config;
        let channel = Arc::new(Channel::new(&config.channel));
        let table = Arc::new(RouteTable::new());
        let federation = Arc::new(Federation::new(
            loader,
            config.viewmodel_directory.clone(),
            Arc::clone(&channel),
        ));
        let pipeline = Arc::new(Pipeline::new(
            Arc::clone(&federation),
            dom,
            fetcher,
            binder,
            Arc::clone(&channel),
            config.view_directory.clone(),
            self.fault_hook.unwrap_or_else(default_fault_hook),
        ));
        let navigator = Navigator::new(
            Arc::clone(&table),
            Arc::clone(&history),
            config.allow_unmatched_navigation,
        );

        Ok(Router {
            config,
            table,
            federation,
            pipeline,
            navigator,
            channel,
            history,
            black_holes: RwLock::new(Vec::new()),
        })
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
