//! The rendering pipeline
//!
//! `render` drives five ordered stages for a view-model id:
//!
//! 1. resolve the record, loading the module on first reference
//! 2. hide every other non-`auto_render` view
//! 3. fetch and bind the template exactly once (re-announce `bound` after)
//! 4. render declared children, no payload forwarded
//! 5. reveal the target and publish `docked` with the payload
//!
//! Failures are caught at the pipeline boundary, handed to the fault hook,
//! and never propagate to the caller; a failed render of one view does not
//! abort renders of other views. Child renders are caught the same way so
//! a broken child does not keep its parent from docking.

use futures::future::BoxFuture;
use orbit_core::Payload;
use orbit_host::{BindingEngine, DomAdapter, ElementHandle, TemplateFetcher};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::channel::Channel;
use crate::error::{Result, RouterError};
use crate::federation::{Federation, ViewModelRecord};

/// Injectable handler for errors caught at the pipeline boundary.
/// The default logs and continues.
pub type FaultHook = Arc<dyn Fn(&str, &RouterError) + Send + Sync>;

pub(crate) fn default_fault_hook() -> FaultHook {
    Arc::new(|view_id, err| {
        error!(view = view_id, "render pipeline failed: {}", err);
    })
}

pub(crate) struct Pipeline {
    federation: Arc<Federation>,
    dom: Arc<dyn DomAdapter>,
    fetcher: Arc<dyn TemplateFetcher>,
    binder: Arc<dyn BindingEngine>,
    channel: Arc<Channel>,
    view_directory: String,
    fault_hook: FaultHook,
}

impl Pipeline {
    pub fn new(
        federation: Arc<Federation>,
        dom: Arc<dyn DomAdapter>,
        fetcher: Arc<dyn TemplateFetcher>,
        binder: Arc<dyn BindingEngine>,
        channel: Arc<Channel>,
        view_directory: String,
        fault_hook: FaultHook,
    ) -> Self {
        Self {
            federation,
            dom,
            fetcher,
            binder,
            channel,
            view_directory,
            fault_hook,
        }
    }

    /// Render a view model. Errors are reported through the fault hook and
    /// do not propagate.
    pub async fn render(&self, id: &str, payload: Option<Payload>) {
        if let Err(err) = self.try_render(id, payload).await {
            (self.fault_hook)(id, &err);
        }
    }

    /// Render a view model, surfacing the error to the caller
    pub async fn try_render(&self, id: &str, payload: Option<Payload>) -> Result<()> {
        let mut visited = HashSet::new();
        self.render_stages(id.to_string(), payload, &mut visited)
            .await
    }

    /// One full pass of the five stages. The visited set spans the whole
    /// child recursion: it guards against cyclic children graphs and keeps
    /// a child render from hiding views revealed earlier in the same chain.
    fn render_stages<'a>(
        &'a self,
        id: String,
        payload: Option<Payload>,
        visited: &'a mut HashSet<String>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if !visited.insert(id.clone()) {
                warn!(view = %id, "cyclic children graph, already rendered in this chain");
                return Ok(());
            }

            // Stage 1: resolve or load
            let record = self.federation.resolve_or_load(&id).await?;

            // Stage 2: hide inactive views, even when already loaded
            self.hide_inactive(visited);

            // Stage 3: load and bind the template exactly once
            self.load_template(&record).await?;

            // Stage 4: children pass through the full pipeline, without the
            // payload; a failing child is logged and skipped
            let children = record.children.clone();
            for child in children {
                if let Err(err) = self
                    .render_stages(child.clone(), None, visited)
                    .await
                {
                    (self.fault_hook)(&child, &err);
                }
            }

            // Stage 5: reveal and notify
            self.reveal(&record, payload.as_ref())?;

            Ok(())
        })
    }

    /// Resolve a record's binding target, failing when nothing matches
    fn dom_elements(&self, record: &ViewModelRecord) -> Result<Vec<ElementHandle>> {
        let elements = self.dom.select(&record.binding);
        if elements.is_empty() {
            return Err(RouterError::MissingDomElement {
                view_id: record.id.clone(),
                selector: record.binding.to_string(),
            });
        }
        Ok(elements)
    }

    fn hide_inactive(&self, active: &HashSet<String>) {
        for view in self.federation.records() {
            if view.auto_render || active.contains(&view.id) {
                continue;
            }
            // A view without a mounted element has nothing to hide
            for element in self.dom.select(&view.binding) {
                self.dom.set_visible(&element, false);
            }
        }
    }

    async fn load_template(&self, record: &ViewModelRecord) -> Result<()> {
        if record.is_loaded() {
            // Re-announce without refetching
            self.channel.publish(&format!("{}.bound", record.id), None);
            return Ok(());
        }

        let path = format!("{}/{}", self.view_directory, record.template_path);
        let elements = self.dom_elements(record)?;

        let response = self.fetcher.fetch(&path).await?;
        if !response.is_success() {
            // Leaves the record unloaded; a later render retries
            return Err(RouterError::TemplateFetch {
                path,
                status: response.status,
            });
        }

        for element in &elements {
            self.dom.inject_html(element, &response.body);
            self.binder.bind(&record.id, element);
        }
        record.mark_loaded();

        debug!(view = %record.id, template = %path, "template bound");
        self.channel.publish(&format!("{}.bound", record.id), None);
        Ok(())
    }

    fn reveal(&self, record: &ViewModelRecord, payload: Option<&Payload>) -> Result<()> {
        for element in self.dom_elements(record)? {
            self.dom.set_visible(&element, true);
        }

        self.channel
            .publish(&format!("{}.docked", record.id), payload);
        Ok(())
    }
}
