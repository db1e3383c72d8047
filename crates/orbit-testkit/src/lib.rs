//! Common test helpers for Orbit
//!
//! This crate provides in-memory host implementations and collectors:
//! - [`MemoryDom`]: element registry with visibility/markup snapshots
//! - [`StaticModuleLoader`]: canned view-model modules with fetch counting
//! - [`StaticTemplateFetcher`]: canned templates with fetch counting
//! - [`RecordingBinder`]: records every bind call
//! - [`MemoryHistory`]: current path plus a push log
//! - [`TopicCollector`]: captures published lifecycle topics
//! - [`TestBench`]: a router assembled over the memory hosts

use async_trait::async_trait;
use dashmap::DashMap;
use orbit_core::{BindingSelector, RouterConfig, ViewModelSpec, DEFAULT_VIEWMODEL_DIRECTORY};
use orbit_host::{
    BindingEngine, DomAdapter, ElementHandle, History, HostError, ModuleLoader, TemplateFetcher,
    TemplateResponse,
};
use orbit_router::{Payload, Router, RouterError};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;

/// Initialize tracing output for tests (respects `RUST_LOG`)
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

// ============================================================================
// Memory DOM
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryElement {
    dom_id: Option<String>,
    class: Option<String>,
    visible: bool,
    html: String,
}

/// In-memory DOM: elements registered by id or class, with visibility and
/// injected markup recorded for assertions. Elements start visible, like
/// markup present in the page.
#[derive(Default)]
pub struct MemoryDom {
    elements: DashMap<String, MemoryElement>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single element addressable by DOM id
    pub fn register_id(&self, dom_id: &str) -> ElementHandle {
        let key = format!("#{}", dom_id);
        self.elements.insert(
            key.clone(),
            MemoryElement {
                dom_id: Some(dom_id.to_string()),
                class: None,
                visible: true,
                html: String::new(),
            },
        );
        ElementHandle::new(key)
    }

    /// Register `count` elements sharing a class
    pub fn register_class(&self, class: &str, count: usize) -> Vec<ElementHandle> {
        (0..count)
            .map(|i| {
                let key = format!(".{}[{}]", class, i);
                self.elements.insert(
                    key.clone(),
                    MemoryElement {
                        dom_id: None,
                        class: Some(class.to_string()),
                        visible: true,
                        html: String::new(),
                    },
                );
                ElementHandle::new(key)
            })
            .collect()
    }

    /// Visibility of an element registered by DOM id
    pub fn id_visible(&self, dom_id: &str) -> bool {
        self.elements
            .get(&format!("#{}", dom_id))
            .map(|el| el.visible)
            .unwrap_or(false)
    }

    /// Markup of an element registered by DOM id
    pub fn id_html(&self, dom_id: &str) -> String {
        self.elements
            .get(&format!("#{}", dom_id))
            .map(|el| el.html.clone())
            .unwrap_or_default()
    }

    pub fn visible(&self, handle: &ElementHandle) -> bool {
        self.elements
            .get(handle.as_str())
            .map(|el| el.visible)
            .unwrap_or(false)
    }

    pub fn html(&self, handle: &ElementHandle) -> String {
        self.elements
            .get(handle.as_str())
            .map(|el| el.html.clone())
            .unwrap_or_default()
    }
}

impl DomAdapter for MemoryDom {
    fn select(&self, selector: &BindingSelector) -> Vec<ElementHandle> {
        let mut handles: Vec<ElementHandle> = self
            .elements
            .iter()
            .filter(|entry| match selector {
                BindingSelector::Id(id) => entry.value().dom_id.as_deref() == Some(id.as_str()),
                BindingSelector::Class(class) => {
                    entry.value().class.as_deref() == Some(class.as_str())
                }
            })
            .map(|entry| ElementHandle::new(entry.key().clone()))
            .collect();
        handles.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        handles
    }

    fn set_visible(&self, element: &ElementHandle, visible: bool) {
        if let Some(mut el) = self.elements.get_mut(element.as_str()) {
            el.visible = visible;
        }
    }

    fn inject_html(&self, element: &ElementHandle, html: &str) {
        if let Some(mut el) = self.elements.get_mut(element.as_str()) {
            el.html = html.to_string();
        }
    }
}

// ============================================================================
// Static module loader
// ============================================================================

/// Module loader backed by a canned path -> spec map; counts fetches so
/// tests can assert at-most-once loading.
#[derive(Default)]
pub struct StaticModuleLoader {
    modules: DashMap<String, ViewModelSpec>,
    fetches: DashMap<String, u32>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under the default view-model directory
    pub fn register(&self, spec: ViewModelSpec) {
        let path = format!("{}/{}.js", DEFAULT_VIEWMODEL_DIRECTORY, spec.id);
        self.modules.insert(path, spec);
    }

    /// Register a module at an explicit path
    pub fn register_at(&self, path: &str, spec: ViewModelSpec) {
        self.modules.insert(path.to_string(), spec);
    }

    /// Register a module from its JSON declaration
    pub fn register_json(&self, path: &str, json: &str) {
        let spec: ViewModelSpec = serde_json::from_str(json).expect("invalid view-model JSON");
        self.modules.insert(path.to_string(), spec);
    }

    /// How many times a path was fetched
    pub fn fetch_count(&self, path: &str) -> u32 {
        self.fetches.get(path).map(|c| *c).unwrap_or(0)
    }

    /// How many times the module for an id was fetched from the default
    /// directory
    pub fn fetch_count_for(&self, id: &str) -> u32 {
        self.fetch_count(&format!("{}/{}.js", DEFAULT_VIEWMODEL_DIRECTORY, id))
    }
}

#[async_trait]
impl ModuleLoader for StaticModuleLoader {
    async fn load(&self, path: &str) -> orbit_host::Result<ViewModelSpec> {
        *self.fetches.entry(path.to_string()).or_insert(0) += 1;
        self.modules
            .get(path)
            .map(|spec| spec.clone())
            .ok_or_else(|| HostError::ModuleNotFound(path.to_string()))
    }
}

// ============================================================================
// Static template fetcher
// ============================================================================

/// Template fetcher backed by canned responses; unknown paths come back as
/// 404 so failed-fetch behavior is easy to exercise.
#[derive(Default)]
pub struct StaticTemplateFetcher {
    templates: DashMap<String, (u16, String)>,
    fetches: DashMap<String, u32>,
}

impl StaticTemplateFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_ok(&self, path: &str, body: &str) {
        self.templates
            .insert(path.to_string(), (200, body.to_string()));
    }

    pub fn register_status(&self, path: &str, status: u16, body: &str) {
        self.templates
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn fetch_count(&self, path: &str) -> u32 {
        self.fetches.get(path).map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl TemplateFetcher for StaticTemplateFetcher {
    async fn fetch(&self, path: &str) -> orbit_host::Result<TemplateResponse> {
        *self.fetches.entry(path.to_string()).or_insert(0) += 1;
        Ok(match self.templates.get(path) {
            Some(entry) => TemplateResponse::with_status(entry.0, entry.1.clone()),
            None => TemplateResponse::with_status(404, ""),
        })
    }
}

// ============================================================================
// Recording binder
// ============================================================================

/// Binding engine that records every (view id, element) pair
#[derive(Default)]
pub struct RecordingBinder {
    binds: Mutex<Vec<(String, String)>>,
}

impl RecordingBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> Vec<(String, String)> {
        self.binds.lock().clone()
    }

    pub fn bind_count_for(&self, view_id: &str) -> usize {
        self.binds.lock().iter().filter(|(v, _)| v == view_id).count()
    }
}

impl BindingEngine for RecordingBinder {
    fn bind(&self, view_id: &str, element: &ElementHandle) {
        self.binds
            .lock()
            .push((view_id.to_string(), element.as_str().to_string()));
    }
}

// ============================================================================
// Memory history
// ============================================================================

/// Browsing history surface holding the current path and a push log
pub struct MemoryHistory {
    path: RwLock<String>,
    log: Mutex<Vec<String>>,
}

impl MemoryHistory {
    pub fn new(initial_path: &str) -> Self {
        Self {
            path: RwLock::new(initial_path.to_string()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Set the current path without recording a push (browser back/forward)
    pub fn set_path(&self, path: &str) {
        *self.path.write() = path.to_string();
    }

    /// Every path pushed so far
    pub fn pushed(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

impl History for MemoryHistory {
    fn push(&self, path: &str) {
        *self.path.write() = path.to_string();
        self.log.lock().push(path.to_string());
    }

    fn current_path(&self) -> String {
        self.path.read().clone()
    }
}

// ============================================================================
// Topic collector
// ============================================================================

/// Collector for lifecycle events published on the router channel
#[derive(Clone, Default)]
pub struct TopicCollector {
    events: Arc<Mutex<Vec<(String, Option<Payload>)>>>,
    notify: Arc<Notify>,
    count: Arc<AtomicU32>,
}

impl TopicCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a subscriber callback for `Channel::subscribe`
    pub fn subscriber(&self) -> impl Fn(&str, Option<&Payload>) + Send + Sync + 'static {
        let events = self.events.clone();
        let notify = self.notify.clone();
        let count = self.count.clone();

        move |topic, payload| {
            events.lock().push((topic.to_string(), payload.cloned()));
            count.fetch_add(1, Ordering::SeqCst);
            notify.notify_waiters();
        }
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn topics(&self) -> Vec<String> {
        self.events.lock().iter().map(|(t, _)| t.clone()).collect()
    }

    /// How many times a topic was published
    pub fn count_of(&self, topic: &str) -> usize {
        self.events.lock().iter().filter(|(t, _)| t == topic).count()
    }

    /// The payload carried by the most recent publish of a topic
    pub fn last_payload_of(&self, topic: &str) -> Option<Payload> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|(t, _)| t == topic)
            .and_then(|(_, p)| p.clone())
    }

    /// Wait for at least `n` events
    pub async fn wait_for_count(&self, n: u32, max_wait: Duration) -> bool {
        loop {
            if self.count() >= n {
                return true;
            }
            if timeout(max_wait, self.notify.notified()).await.is_err() {
                return self.count() >= n;
            }
        }
    }
}

// ============================================================================
// Test bench - a router over the memory hosts
// ============================================================================

/// A router assembled over the in-memory hosts, with every host handle
/// kept for assertions.
pub struct TestBench {
    pub dom: Arc<MemoryDom>,
    pub loader: Arc<StaticModuleLoader>,
    pub fetcher: Arc<StaticTemplateFetcher>,
    pub binder: Arc<RecordingBinder>,
    pub history: Arc<MemoryHistory>,
    pub router: Router,
}

impl TestBench {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self::build(config, None)
    }

    /// Assemble a bench whose router reports pipeline faults to `hook`
    pub fn with_fault_hook<F>(hook: F) -> Self
    where
        F: Fn(&str, &RouterError) + Send + Sync + 'static,
    {
        Self::build(RouterConfig::default(), Some(Box::new(hook)))
    }

    #[allow(clippy::type_complexity)]
    fn build(
        config: RouterConfig,
        hook: Option<Box<dyn Fn(&str, &RouterError) + Send + Sync>>,
    ) -> Self {
        let dom = Arc::new(MemoryDom::new());
        let loader = Arc::new(StaticModuleLoader::new());
        let fetcher = Arc::new(StaticTemplateFetcher::new());
        let binder = Arc::new(RecordingBinder::new());
        let history = Arc::new(MemoryHistory::new("/"));

        let mut builder = Router::builder()
            .config(config)
            .dom(Arc::clone(&dom))
            .module_loader(Arc::clone(&loader))
            .template_fetcher(Arc::clone(&fetcher))
            .binding_engine(Arc::clone(&binder))
            .history(Arc::clone(&history));

        if let Some(hook) = hook {
            builder = builder.fault_hook(move |id, err| hook(id, err));
        }

        let router = builder.build().expect("test bench router");

        Self {
            dom,
            loader,
            fetcher,
            binder,
            history,
            router,
        }
    }

    /// Join a view model backed by a registered DOM id element and a
    /// registered template. Convenience for the common test setup.
    pub fn install_view(&self, id: &str, template_body: &str) {
        let dom_id = format!("{}-region", id);
        self.dom.register_id(&dom_id);
        let template_path = format!("{}.html", id);
        self.fetcher.register_ok(
            &format!("{}/{}", self.router.config().view_directory, template_path),
            template_body,
        );
        self.router
            .join(&ViewModelSpec::new(id, format!("#{}", dom_id), template_path))
            .expect("join view");
    }

    /// DOM id an `install_view` view binds to
    pub fn region_of(&self, id: &str) -> String {
        format!("{}-region", id)
    }
}

impl Default for TestBench {
    fn default() -> Self {
        Self::new()
    }
}
