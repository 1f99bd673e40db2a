use std::fmt;
use std::rc::Rc;

use focusdom::{Event, EventType};

use crate::runtime::Runtime;

/// Callback run when an event reaches a node the listener is attached to.
pub type Handler = Rc<dyn Fn(&mut Runtime, &Event)>;

/// A handler together with the events it listens to.
///
/// ```ignore
/// let listener = Listener::on(["touchstart", "mousedown"], |rt, event| {
///     log::debug!("pressed {}", event.target);
/// });
/// ```
#[derive(Clone)]
pub struct Listener {
    pub events: Vec<EventType>,
    pub capture: bool,
    pub handler: Handler,
}

impl Listener {
    /// Listen to a single event type.
    pub fn new(
        event: impl Into<EventType>,
        handler: impl Fn(&mut Runtime, &Event) + 'static,
    ) -> Self {
        Self {
            events: vec![event.into()],
            capture: false,
            handler: Rc::new(handler),
        }
    }

    /// Listen to several event types with the same handler.
    pub fn on<E: Into<EventType>>(
        events: impl IntoIterator<Item = E>,
        handler: impl Fn(&mut Runtime, &Event) + 'static,
    ) -> Self {
        Self {
            events: events.into_iter().map(Into::into).collect(),
            capture: false,
            handler: Rc::new(handler),
        }
    }

    /// Run during the capture phase instead of the bubble phase.
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("events", &self.events)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}
