//! Orbit Router
//!
//! The router is the central hub for client-side view navigation:
//! - Matches location paths against registered route templates
//! - Tracks joined view models in the federation registry
//! - Drives the load / bind / reveal / notify rendering pipeline
//! - Publishes lifecycle events (`<id>.joined`, `<id>.bound`, `<id>.docked`)
//!
//! The host environment (DOM, module loader, template fetcher, binding
//! engine, history) is abstracted behind the `orbit-host` traits, so the
//! router itself is host-agnostic and testable in-process.
//!
//! # Example
//!
//! ```no_run
//! use orbit_router::Router;
//! # use std::sync::Arc;
//! # async fn example(dom: Arc<orbit_testkit::MemoryDom>,
//! #                  loader: Arc<orbit_testkit::StaticModuleLoader>,
//! #                  fetcher: Arc<orbit_testkit::StaticTemplateFetcher>,
//! #                  binder: Arc<orbit_testkit::RecordingBinder>,
//! #                  history: Arc<orbit_testkit::MemoryHistory>)
//! #                  -> orbit_router::Result<()> {
//! let router = Router::builder()
//!     .dom(dom)
//!     .module_loader(loader)
//!     .template_fetcher(fetcher)
//!     .binding_engine(binder)
//!     .history(history)
//!     .build()?;
//!
//! router.route("home").to("homeVM")?;
//! router.route("user/:id").to("userVM")?;
//! router.scan().await;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod error;
pub mod federation;
pub mod navigator;
pub mod pipeline;
pub mod registry;
pub mod router;

pub use channel::Channel;
pub use error::{Result, RouterError};
pub use federation::{Federation, JoinOutcome, ViewModelRecord};
pub use navigator::{NavigationRequest, Navigator};
pub use pipeline::FaultHook;
pub use registry::{Route, RouteCallback, RouteMatch, RouteTable};
pub use router::{Router, RouterBuilder};

pub use orbit_core::{Payload, RouterConfig, ViewModelSpec};
