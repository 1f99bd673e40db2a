//! Widget generation on top of a [`focusdom`] document.
//!
//! Constructors build markup, insert it, record the new instance under a
//! generated [`WidgetId`] and bind its listeners. Markup can later be moved
//! around; [`Runtime::rebind`] restores the listeners and re-points the
//! records of everything inside it.
//!
//! ```ignore
//! use focus::prelude::*;
//!
//! let mut rt = Runtime::new();
//! let slider = Slider::new(&mut rt, Some(".question"), SliderDescriptor::new(0.0, 10.0), None);
//! slider.set_value(&mut rt, 7.0, None);
//! ```

pub mod descriptor;
pub mod error;
pub mod id;
pub mod listener;
pub mod logging;
pub mod registry;
pub mod runtime;
pub mod widgets;
pub mod word_match;

pub use error::FocusError;
pub use id::WidgetId;
pub use runtime::Runtime;

pub mod prelude {
    pub use crate::descriptor::Common;
    pub use crate::error::FocusError;
    pub use crate::id::WidgetId;
    pub use crate::listener::{Handler, Listener};
    pub use crate::registry::{Registry, WidgetData, WidgetRecord};
    pub use crate::runtime::scheduler::TimerId;
    pub use crate::runtime::Runtime;
    pub use crate::widgets::{
        Accordion, AccordionDescriptor, Banner, BannerDescriptor, Button, ButtonDescriptor,
        Direction, Grid, GridDescriptor, GridItem, GridItemDescriptor, ImageTextZone,
        ImageTextZoneDescriptor, ItemContent, LabelList, LabelListDescriptor, RateSlider,
        RateSliderDescriptor, RenderFn, ResultList, ResultListDescriptor, Scroller,
        ScrollerDescriptor, Selection, SelectionMode, Slider, SliderDescriptor,
        SubSliderDescriptor, Widget,
    };
    pub use crate::word_match::{WordMatch, MATCHING_COMPLETE};

    pub use focusdom::{Detail, Document, Event, EventType, Key, NodeId, Rect};
}
