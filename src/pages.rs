//! data-defined dialog pages and the graph that links them
//!
//! a graph is loaded once from a [`DialogDefinition`](crate::definition::DialogDefinition):
//! ```no_run
//! # use std::sync::Arc;
//! # use pagespinner::{DialogDefinition, DialogPageGraph, DialogServices, HostRef, SessionRef};
//! # let services: Arc<DialogServices> = todo!();
//! # let (host, session): (HostRef, SessionRef) = todo!();
//! let definition = DialogDefinition::from_path("assets/dialogs/guide.dialog.ron".as_ref())?;
//! let graph = DialogPageGraph::load("guide", definition, services)?;
//! graph.default_page().send(&host, &session);
//! # Ok::<(), pagespinner::DialogError>(())
//! ```
//! clicks and closes come back through the transmitted [`DialogWindow`](crate::DialogWindow).

mod action;
mod graph;
mod page;
mod types;

pub use action::{Button, ButtonAction};
pub use graph::DialogPageGraph;
pub use page::DialogPage;
pub use types::SoundRef;
