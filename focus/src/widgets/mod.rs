//! Widget constructors.
//!
//! Every constructor follows the same path: resolve the containers, build
//! the markup for each one, insert it, store a [`WidgetRecord`], then bind
//! listeners. The value it returns is a handle holding the identifiers of
//! the generated instances; the state itself always lives in the
//! [`Runtime`].

pub mod accordion;
pub mod banner;
pub mod button;
pub mod grid;
pub mod image_text_zone;
pub mod label_list;
pub mod rate_slider;
pub mod result_list;
pub mod scroller;
pub mod selection;
pub mod slider;

use focusdom::{Document, NodeId};

use crate::id::WidgetId;
use crate::listener::Listener;
use crate::registry::{WidgetData, WidgetRecord};
use crate::runtime::Runtime;

pub use accordion::{Accordion, AccordionDescriptor};
pub use banner::{Banner, BannerDescriptor};
pub use button::{Button, ButtonDescriptor};
pub use grid::{Grid, GridDescriptor, GridItem, GridItemDescriptor, ItemContent};
pub use image_text_zone::{ImageTextZone, ImageTextZoneDescriptor};
pub use label_list::{LabelList, LabelListDescriptor};
pub use rate_slider::{RateSlider, RateSliderDescriptor};
pub use result_list::{RenderFn, ResultList, ResultListDescriptor};
pub use scroller::{Direction, Scroller, ScrollerDescriptor};
pub use selection::{Selection, SelectionMode};
pub use slider::{Slider, SliderDescriptor, SubSliderDescriptor};

/// Handle on the instances generated by one constructor call.
pub trait Widget {
    /// Identifiers of the generated instances, one per container.
    fn ids(&self) -> &[WidgetId];

    /// Records of the generated instances that still exist.
    fn generated<'a>(&self, rt: &'a Runtime) -> Vec<&'a WidgetRecord> {
        self.ids()
            .iter()
            .filter_map(|id| rt.registry().find(id))
            .collect()
    }

    /// Remove every instance from the document and the registry.
    fn dispose(&self, rt: &mut Runtime) {
        for &id in self.ids() {
            rt.dispose(id);
        }
    }

    fn len(&self) -> usize {
        self.ids().len()
    }

    fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// Instances an operation applies to: the one named by `target` if this
    /// handle owns it, every instance otherwise.
    fn targets(&self, target: Option<WidgetId>) -> Vec<WidgetId> {
        match target {
            Some(id) if self.ids().contains(&id) => vec![id],
            Some(id) => {
                log::warn!("{id} is not an instance of this widget");
                Vec::new()
            }
            None => self.ids().to_vec(),
        }
    }
}

/// Insert one instance and record it.
///
/// `data` builds the record payload once the markup is in the document.
/// The record tracks the element carrying `id`, which is the inserted
/// element itself or one of its descendants. Common listeners are delegated
/// to `id`. Failures are logged and yield `None`.
pub(crate) fn mount(
    rt: &mut Runtime,
    id: WidgetId,
    markup: &str,
    container: NodeId,
    position: Option<usize>,
    listeners: &[Listener],
    data: impl FnOnce(&Document, NodeId) -> WidgetData,
) -> Option<NodeId> {
    let root = match rt.insert(markup, container, position) {
        Ok(root) => root,
        Err(err) => {
            log::error!("could not insert widget {id}: {err}");
            return None;
        }
    };
    let node = if rt.widget_id_of(root) == Some(id) {
        root
    } else {
        let selector = format!("[data-hash=\"{id}\"]");
        match rt.document().select_first(root, &selector) {
            Ok(Some(node)) => node,
            Ok(None) => {
                log::error!("inserted markup does not carry {id}");
                return None;
            }
            Err(err) => {
                log::error!("could not locate widget {id}: {err}");
                return None;
            }
        }
    };

    let payload = data(rt.document(), node);
    let kind = payload.kind();
    rt.registry_mut()
        .record(WidgetRecord::new(id, node, None, payload));
    rt.refresh(node);
    rt.delegate(id, listeners.iter().cloned());
    log::debug!("mounted {kind} {id} in {container}");
    Some(node)
}
