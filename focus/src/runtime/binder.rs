//! Listener binding, delegation and rebinding.

use std::rc::Rc;

use focusdom::{Attachment, EventType, ListenerId, NodeId};

use crate::id::WidgetId;
use crate::listener::{Handler, Listener};

use super::Runtime;

/// Entry of the listener log, replayed by [`Runtime::rebind`].
#[derive(Debug, Clone)]
pub(crate) struct LoggedListener {
    /// Identifier of the node the listener was bound to. Listeners bound to
    /// nodes without one are never replayed.
    pub hash: Option<WidgetId>,
    pub listener: ListenerId,
    pub events: Vec<EventType>,
    pub capture: bool,
}

impl Runtime {
    fn register(&mut self, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.handlers.insert(id, handler);
        id
    }

    /// Attach `listeners` to `node` for each of their event types and log
    /// them under the node's identifier.
    pub fn bind(
        &mut self,
        node: NodeId,
        listeners: impl IntoIterator<Item = Listener>,
    ) -> Vec<ListenerId> {
        let hash = self.widget_id_of(node);
        let mut ids = Vec::new();
        for listener in listeners {
            let id = self.register(listener.handler);
            for event in &listener.events {
                self.document
                    .add_listener(node, Attachment::new(id, event.clone(), listener.capture));
            }
            self.event_log.push(LoggedListener {
                hash,
                listener: id,
                events: listener.events,
                capture: listener.capture,
            });
            ids.push(id);
        }
        ids
    }

    /// [`bind`](Self::bind) on a node outside `widget`'s markup. The
    /// listeners are dropped when the widget is disposed.
    pub fn bind_for(
        &mut self,
        widget: WidgetId,
        node: NodeId,
        listeners: impl IntoIterator<Item = Listener>,
    ) -> Vec<ListenerId> {
        let ids = self.bind(node, listeners);
        self.attached
            .entry(widget)
            .or_default()
            .extend(ids.iter().map(|&id| (node, id)));
        ids
    }

    /// Attach `listeners` to the body, running them only for events whose
    /// target carries `widget` as its identifier.
    pub fn delegate(
        &mut self,
        widget: WidgetId,
        listeners: impl IntoIterator<Item = Listener>,
    ) -> Vec<ListenerId> {
        let body = self.document.body();
        let mut ids = Vec::new();
        for listener in listeners {
            let inner = listener.handler;
            let filtered: Handler = Rc::new(move |rt, event| {
                if rt.widget_id_of(event.target) == Some(widget) {
                    inner(rt, event);
                }
            });
            let id = self.register(filtered);
            for event in &listener.events {
                self.document
                    .add_listener(body, Attachment::new(id, event.clone(), listener.capture));
            }
            ids.push(id);
        }
        self.delegated.entry(widget).or_default().extend(&ids);
        ids
    }

    /// Refresh registry records and reattach logged listeners for `node`
    /// and every element below it.
    ///
    /// Attachments are deduplicated by the document, so rebinding an
    /// already bound subtree changes nothing.
    pub fn rebind(&mut self, node: NodeId) {
        let mut stack = vec![node];
        let mut reattached = 0;
        while let Some(current) = stack.pop() {
            self.registry.refresh(&self.document, current);

            if let Some(hash) = self.widget_id_of(current) {
                for entry in self.event_log.iter().filter(|e| e.hash == Some(hash)) {
                    for event in &entry.events {
                        let attachment = Attachment::new(entry.listener, event.clone(), entry.capture);
                        if self.document.add_listener(current, attachment) {
                            reattached += 1;
                        }
                    }
                }
            }

            stack.extend(self.document.element_children(current).into_iter().rev());
        }
        if reattached > 0 {
            log::debug!("rebind {node}: reattached {reattached} listener(s)");
        }
    }

    /// Drop logged listeners whose identifier is in `hashes`, detaching them
    /// from `nodes` as well.
    pub(crate) fn forget_logged(&mut self, hashes: &[WidgetId], nodes: &[NodeId]) {
        let (dropped, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.event_log)
            .into_iter()
            .partition(|e| e.hash.is_some_and(|h| hashes.contains(&h)));
        self.event_log = kept;
        for entry in dropped {
            for &node in nodes {
                self.document.remove_listener_id(node, entry.listener);
            }
            self.handlers.remove(&entry.listener);
        }
    }

    pub(crate) fn forget_delegated(&mut self, widget: WidgetId) {
        let Some(listeners) = self.delegated.remove(&widget) else {
            return;
        };
        let body = self.document.body();
        for listener in listeners {
            self.document.remove_listener_id(body, listener);
            self.handlers.remove(&listener);
        }
    }

    pub(crate) fn forget_attached(&mut self, widget: WidgetId) {
        let Some(listeners) = self.attached.remove(&widget) else {
            return;
        };
        for (node, listener) in listeners {
            self.document.remove_listener_id(node, listener);
            self.handlers.remove(&listener);
            self.event_log.retain(|e| e.listener != listener);
        }
    }

    /// Number of listeners in the rebind log.
    pub fn logged_listeners(&self) -> usize {
        self.event_log.len()
    }

    /// Number of live handlers, bound or delegated.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
