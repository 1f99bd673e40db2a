//! Event dispatch through the document tree.

use focusdom::{Event, EventType, NodeId, Phase};

use crate::listener::Handler;

use super::Runtime;

impl Runtime {
    /// Deliver `event` to its target.
    ///
    /// Capture listeners run from the root down to the target's parent,
    /// then every listener on the target, then non-capture listeners back
    /// up to the root if the event bubbles. Handlers see a copy of the event
    /// with `current_target` and `phase` set.
    pub fn dispatch(&mut self, event: Event) {
        let path = self.document.propagation_path(event.target);
        let Some((&target, ancestors)) = path.split_last() else {
            return;
        };
        log::debug!("dispatch {} at {target}", event.kind);

        for &node in ancestors {
            self.invoke(node, &event, Phase::Capturing);
        }
        self.invoke(target, &event, Phase::AtTarget);
        if event.kind.bubbles() {
            for &node in ancestors.iter().rev() {
                self.invoke(node, &event, Phase::Bubbling);
            }
        }
    }

    /// Dispatch a plain event of `kind` at `target`.
    pub fn fire(&mut self, kind: impl Into<EventType>, target: NodeId) {
        self.dispatch(Event::new(kind, target));
    }

    fn invoke(&mut self, node: NodeId, event: &Event, phase: Phase) {
        let handlers: Vec<Handler> = self
            .document
            .attachments(node)
            .iter()
            .filter(|a| a.event == event.kind)
            .filter(|a| match phase {
                Phase::Capturing => a.capture,
                Phase::AtTarget => true,
                Phase::Bubbling => !a.capture,
            })
            .filter_map(|a| self.handlers.get(&a.listener).cloned())
            .collect();
        if handlers.is_empty() {
            return;
        }

        let mut current = event.clone();
        current.current_target = node;
        current.phase = phase;
        for handler in handlers {
            handler(self, &current);
        }
    }
}
