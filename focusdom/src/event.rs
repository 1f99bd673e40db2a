use crate::node::NodeId;

/// Event names understood by the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseEnter,
    MouseLeave,
    MouseOut,
    TouchStart,
    TouchEnd,
    TouchMove,
    KeyDown,
    Scroll,
    /// Application defined event, e.g. `matchingComplete`.
    Custom(String),
}

impl EventType {
    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::MouseOut => "mouseout",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::TouchMove => "touchmove",
            Self::KeyDown => "keydown",
            Self::Scroll => "scroll",
            Self::Custom(name) => name,
        }
    }

    /// Whether the event propagates back up after reaching its target.
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::MouseEnter | Self::MouseLeave | Self::Scroll)
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchEnd | Self::TouchMove)
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mousemove" => Self::MouseMove,
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            "mouseout" => Self::MouseOut,
            "touchstart" => Self::TouchStart,
            "touchend" => Self::TouchEnd,
            "touchmove" => Self::TouchMove,
            "keydown" => Self::KeyDown,
            "scroll" => Self::Scroll,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// Payload of custom events.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Words(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    Capturing,
    #[default]
    AtTarget,
    Bubbling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventType,
    pub target: NodeId,
    /// Node whose listener is currently running. Set during dispatch.
    pub current_target: NodeId,
    pub phase: Phase,
    /// Pointer position relative to the target's box.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Pointer position relative to the viewport.
    pub client_x: f64,
    pub client_y: f64,
    /// Horizontal pointer delta since the previous move. Touch events do
    /// not carry one.
    pub movement_x: Option<f64>,
    pub key: Option<Key>,
    pub detail: Option<Detail>,
}

impl Event {
    pub fn new(kind: impl Into<EventType>, target: NodeId) -> Self {
        Self {
            kind: kind.into(),
            target,
            current_target: target,
            phase: Phase::AtTarget,
            offset_x: 0.0,
            offset_y: 0.0,
            client_x: 0.0,
            client_y: 0.0,
            movement_x: None,
            key: None,
            detail: None,
        }
    }

    pub fn offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn client(mut self, x: f64, y: f64) -> Self {
        self.client_x = x;
        self.client_y = y;
        self
    }

    pub fn movement(mut self, dx: f64) -> Self {
        self.movement_x = Some(dx);
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    pub fn detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Handle of a listener owned by whoever dispatches events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A listener attached to a node for one event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attachment {
    pub listener: ListenerId,
    pub event: EventType,
    pub capture: bool,
}

impl Attachment {
    pub fn new(listener: ListenerId, event: EventType, capture: bool) -> Self {
        Self {
            listener,
            event,
            capture,
        }
    }
}
