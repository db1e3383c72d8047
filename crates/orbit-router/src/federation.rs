//! View federation registry
//!
//! The federation owns the canonical runtime record for every joined view
//! model. Joining is idempotent: a re-join of a non-child record is a no-op
//! with a warning, a re-join of a declared child is silent. Declared
//! children are joined alongside their parent with a `parent_id` back
//! reference; ownership stays with the federation, never with the parent.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use orbit_core::{BindingSelector, ViewModelSpec};
use orbit_host::ModuleLoader;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::error::{Result, RouterError};

/// Runtime record for a joined view model
#[derive(Debug)]
pub struct ViewModelRecord {
    pub id: String,
    /// Parsed DOM binding target
    pub binding: BindingSelector,
    /// Template resource path, relative to the view directory
    pub template_path: String,
    /// Never hidden by other renders
    pub auto_render: bool,
    /// Id of the parent that declared this record as a child
    pub parent_id: Option<String>,
    /// Ids of declared children, in declaration order
    pub children: Vec<String>,
    loaded: AtomicBool,
}

impl ViewModelRecord {
    fn from_spec(spec: &ViewModelSpec, parent_id: Option<String>) -> Result<Self> {
        Ok(Self {
            id: spec.id.clone(),
            binding: BindingSelector::parse(&spec.dom_binding_id)?,
            template_path: spec.template_path.clone(),
            auto_render: spec.auto_render,
            parent_id,
            children: spec.children.iter().map(|c| c.id.clone()).collect(),
            loaded: AtomicBool::new(false),
        })
    }

    /// Whether the template has been fetched and bound
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Flip `loaded` to true. Returns whether this call made the
    /// transition; the flag is never reset.
    pub(crate) fn mark_loaded(&self) -> bool {
        !self.loaded.swap(true, Ordering::SeqCst)
    }
}

/// Outcome of a join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

/// The registry of joined view models
pub struct Federation {
    records: DashMap<String, Arc<ViewModelRecord>>,
    /// Join order, for deterministic iteration
    order: RwLock<Vec<String>>,
    /// Per-id gates serializing module loads
    loading: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    loader: Arc<dyn ModuleLoader>,
    viewmodel_directory: String,
    channel: Arc<Channel>,
}

impl Federation {
    pub fn new(
        loader: Arc<dyn ModuleLoader>,
        viewmodel_directory: String,
        channel: Arc<Channel>,
    ) -> Self {
        Self {
            records: DashMap::new(),
            order: RwLock::new(Vec::new()),
            loading: DashMap::new(),
            loader,
            viewmodel_directory,
            channel,
        }
    }

    /// Join a view model and its first-level children.
    ///
    /// Grandchildren are not joined here; their ids are recorded on the
    /// child record and they join when that child renders and resolves
    /// them. Publishes `<id>.joined` on first join only.
    pub fn join(&self, spec: &ViewModelSpec) -> Result<JoinOutcome> {
        let outcome = self.insert(spec, None)?;
        for child in &spec.children {
            self.insert(child, Some(spec.id.clone()))?;
        }
        Ok(outcome)
    }

    fn insert(&self, spec: &ViewModelSpec, parent_id: Option<String>) -> Result<JoinOutcome> {
        match self.records.entry(spec.id.clone()) {
            Entry::Occupied(_) => {
                // Re-joining as someone's child is expected and silent
                if parent_id.is_none() {
                    warn!(id = %spec.id, "view model has already joined the federation");
                }
                return Ok(JoinOutcome::AlreadyJoined);
            }
            Entry::Vacant(vacant) => {
                let record = Arc::new(ViewModelRecord::from_spec(spec, parent_id)?);
                vacant.insert(record);
            }
        }

        self.order.write().push(spec.id.clone());
        debug!(id = %spec.id, "view model joined the federation");
        self.channel.publish(&format!("{}.joined", spec.id), None);

        Ok(JoinOutcome::Joined)
    }

    /// Look up a joined record by id
    pub fn lookup(&self, id: &str) -> Option<Arc<ViewModelRecord>> {
        self.records.get(id).map(|r| Arc::clone(r.value()))
    }

    /// All joined records, in join order
    pub fn records(&self) -> Vec<Arc<ViewModelRecord>> {
        self.order
            .read()
            .iter()
            .filter_map(|id| self.lookup(id))
            .collect()
    }

    /// Number of joined records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a record, loading and joining the module on first reference.
    ///
    /// Loads are serialized per id: concurrent callers for the same
    /// unregistered id share a single module fetch.
    pub async fn resolve_or_load(&self, id: &str) -> Result<Arc<ViewModelRecord>> {
        if let Some(record) = self.lookup(id) {
            return Ok(record);
        }

        let gate = {
            let entry = self
                .loading
                .entry(id.to_string())
                .or_insert_with(Default::default);
            Arc::clone(entry.value())
        };
        let _permit = gate.lock().await;

        // Another caller may have finished the load while we waited
        if let Some(record) = self.lookup(id) {
            self.loading.remove(id);
            return Ok(record);
        }

        warn!(id, "view model has not joined the federation, attempting to join now");
        let result = self.load_and_join(id).await;
        self.loading.remove(id);
        result
    }

    async fn load_and_join(&self, id: &str) -> Result<Arc<ViewModelRecord>> {
        let path = format!("{}/{}.js", self.viewmodel_directory, id);
        let spec = self
            .loader
            .load(&path)
            .await
            .map_err(|_| RouterError::MissingViewModel(id.to_string()))?;

        self.join(&spec)?;
        self.lookup(id)
            .ok_or_else(|| RouterError::MissingViewModel(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use orbit_host::HostError;

    struct NoLoader;

    #[async_trait]
    impl ModuleLoader for NoLoader {
        async fn load(&self, path: &str) -> orbit_host::Result<ViewModelSpec> {
            Err(HostError::ModuleNotFound(path.to_string()))
        }
    }

    fn federation() -> Federation {
        Federation::new(
            Arc::new(NoLoader),
            "/app/viewmodel".to_string(),
            Arc::new(Channel::new("test")),
        )
    }

    #[test]
    fn test_join_is_idempotent() {
        let federation = federation();
        let spec = ViewModelSpec::new("home", "#home", "home.html");

        assert_eq!(federation.join(&spec).unwrap(), JoinOutcome::Joined);
        assert_eq!(federation.join(&spec).unwrap(), JoinOutcome::AlreadyJoined);
        assert_eq!(federation.len(), 1);
    }

    #[test]
    fn test_join_links_children() {
        let federation = federation();
        let spec = ViewModelSpec::new("parent", "#parent", "parent.html")
            .child(ViewModelSpec::new("child", "#child", "child.html"));

        federation.join(&spec).unwrap();

        assert_eq!(federation.len(), 2);
        let child = federation.lookup("child").unwrap();
        assert_eq!(child.parent_id.as_deref(), Some("parent"));
        let parent = federation.lookup("parent").unwrap();
        assert!(parent.parent_id.is_none());
        assert_eq!(parent.children, vec!["child".to_string()]);
    }

    #[test]
    fn test_join_stops_at_first_level() {
        let federation = federation();
        let spec = ViewModelSpec::new("root", "#root", "root.html").child(
            ViewModelSpec::new("child", "#child", "child.html")
                .child(ViewModelSpec::new("grandchild", "#gc", "gc.html")),
        );

        federation.join(&spec).unwrap();

        assert_eq!(federation.len(), 2);
        assert!(federation.lookup("grandchild").is_none());
        let child = federation.lookup("child").unwrap();
        assert_eq!(child.children, vec!["grandchild".to_string()]);
    }

    #[test]
    fn test_loaded_flips_once() {
        let federation = federation();
        federation
            .join(&ViewModelSpec::new("home", "#home", "home.html"))
            .unwrap();

        let record = federation.lookup("home").unwrap();
        assert!(!record.is_loaded());
        assert!(record.mark_loaded());
        assert!(!record.mark_loaded());
        assert!(record.is_loaded());
    }

    #[tokio::test]
    async fn test_resolve_unknown_id() {
        let federation = federation();
        let err = federation.resolve_or_load("ghost").await.unwrap_err();
        assert!(matches!(err, RouterError::MissingViewModel(id) if id == "ghost"));
    }
}
