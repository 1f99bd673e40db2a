//! Focus runtime - owns the document, the widget registry, the listener
//! log and the timers.

mod binder;
mod dispatch;
pub mod scheduler;

use std::collections::HashMap;

use focusdom::{Document, ListenerId, NodeId};

use crate::error::FocusError;
use crate::id::WidgetId;
use crate::listener::Handler;
use crate::registry::{self, Registry, WidgetData};

use binder::LoggedListener;
use scheduler::Scheduler;

/// Pointer drag in progress.
#[derive(Debug, Default)]
pub(crate) struct DragState {
    /// Elements being dragged, first pressed first.
    pub stack: Vec<NodeId>,
    /// Last touch position, touch events carry no movement delta.
    pub last_client_x: Option<f64>,
}

/// Single-threaded widget runtime.
///
/// Everything widgets touch lives here, and handlers receive `&mut Runtime`.
/// Markup insertion, rebinding and event dispatch therefore always run to
/// completion before the next handler starts.
pub struct Runtime {
    document: Document,
    registry: Registry,

    /// Handlers by listener id. Attachments in the document refer to these.
    handlers: HashMap<ListenerId, Handler>,
    next_listener: u64,
    /// Every directly bound listener with the identifier of its node.
    event_log: Vec<LoggedListener>,
    /// Body listeners installed by `delegate`, per widget.
    delegated: HashMap<WidgetId, Vec<ListenerId>>,
    /// Listeners a widget bound on nodes outside its own markup.
    attached: HashMap<WidgetId, Vec<(NodeId, ListenerId)>>,

    pub(crate) drag: DragState,
    scheduler: Scheduler,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            registry: Registry::new(),
            handlers: HashMap::new(),
            next_listener: 0,
            event_log: Vec::new(),
            delegated: HashMap::new(),
            attached: HashMap::new(),
            drag: DragState::default(),
            scheduler: Scheduler::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Identifier in the `data-hash` attribute of `node`.
    pub fn widget_id_of(&self, node: NodeId) -> Option<WidgetId> {
        registry::hash_of(&self.document, node)
    }

    /// Connected element carrying `id`.
    pub fn find_node(&self, id: WidgetId) -> Option<NodeId> {
        self.document.find_by_attr("data-hash", &id.to_string())
    }

    /// Outermost element generated for a widget. Differs from the record's
    /// node only for banners, whose hashed element sits inside a wrapper.
    pub fn widget_root(&self, id: WidgetId) -> Option<NodeId> {
        let record = self.registry.find(&id)?;
        match record.data {
            WidgetData::Banner => self.document.parent(record.node).or(Some(record.node)),
            _ => Some(record.node),
        }
    }

    /// Re-read the record owning `node` from the document.
    pub fn refresh(&mut self, node: NodeId) {
        self.registry.refresh(&self.document, node);
    }

    // =========================================================================
    // DOM mutation
    // =========================================================================

    /// Parse `markup` and insert it into `parent` before the `position`-th
    /// element child. `None` or an out of range position appends.
    ///
    /// Every inserted element is rebound, which restores the listeners and
    /// the registry state of widgets whose markup was generated earlier.
    /// Returns the first inserted element.
    pub fn insert(
        &mut self,
        markup: &str,
        parent: NodeId,
        position: Option<usize>,
    ) -> Result<NodeId, FocusError> {
        let inserted = self.document.insert_markup(parent, position, markup)?;
        let elements: Vec<NodeId> = inserted
            .into_iter()
            .filter(|&n| self.document.is_element(n))
            .collect();
        let Some(&first) = elements.first() else {
            return Err(FocusError::NoElement);
        };
        for &element in &elements {
            self.rebind(element);
        }
        log::debug!("inserted {first} into {parent} at {position:?}");
        Ok(first)
    }

    /// Resolve a container selector. `None` or an empty selector means the
    /// body. An invalid selector is logged and resolves to nothing.
    pub fn containers(&self, selector: Option<&str>) -> Vec<NodeId> {
        let selector = selector.map(str::trim).unwrap_or_default();
        if selector.is_empty() {
            return vec![self.document.body()];
        }
        match self.document.query_all(selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::error!("invalid container selector {selector:?}: {err}");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Class helpers
    // =========================================================================

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.document.has_class(node, class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.document.add_class(node, class);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.document.remove_class(node, class);
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Forget a widget: drop its record, the listeners bound inside it, its
    /// delegated body listeners and those it bound on its container, then
    /// detach its markup.
    ///
    /// Widgets that were moved inside it (grid contents) go with it.
    /// Returns `false` if no record exists for `id`.
    pub fn dispose(&mut self, id: WidgetId) -> bool {
        let Some(root) = self.widget_root(id) else {
            return false;
        };
        let Some(record) = self.registry.remove(&id) else {
            return false;
        };

        let mut subtree = vec![root];
        subtree.extend(self.document.descendants(root));
        let hashes: Vec<WidgetId> = subtree
            .iter()
            .filter_map(|&n| self.widget_id_of(n))
            .collect();
        self.forget_logged(&hashes, &subtree);

        self.forget_delegated(id);
        self.forget_attached(id);
        for hash in hashes {
            if self.registry.remove(&hash).is_some() {
                self.forget_delegated(hash);
                self.forget_attached(hash);
            }
        }

        self.document.detach(root);
        log::debug!("disposed {} {id}", record.data.kind());
        true
    }
}
