pub mod document;
pub mod event;
pub mod geometry;
pub mod markup;
pub mod node;
pub mod selector;
pub mod style;

pub use document::{Ancestors, Document};
pub use event::{Attachment, Detail, Event, EventType, Key, ListenerId, Phase};
pub use geometry::{Offset, Rect, ScrollBox};
pub use markup::{parse_fragment, MarkupError, ParsedNode};
pub use node::{ElementData, NodeId, NodeKind};
pub use selector::{Selector, SelectorError};
pub use style::{px, Style};
