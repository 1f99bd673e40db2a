//! Side table from widget identifiers to widget state.
//!
//! Records hold [`NodeId`]s into the document. The document owns the nodes;
//! a record only points at them, and [`Registry::refresh`] re-points it after
//! its markup was detached and reinserted.

use std::collections::HashMap;

use focusdom::{Document, NodeId};

use crate::id::WidgetId;
use crate::widgets::grid::GridData;
use crate::widgets::label_list::LabelListData;
use crate::widgets::rate_slider::RateSliderData;
use crate::widgets::result_list::ResultListData;
use crate::widgets::scroller::ScrollerData;
use crate::widgets::slider::SliderData;

/// State of one generated widget instance.
#[derive(Debug, Clone)]
pub struct WidgetRecord {
    pub id: WidgetId,
    /// The element carrying `data-hash = id`.
    pub node: NodeId,
    /// Parent of the widget at the time of the last refresh.
    pub container: Option<NodeId>,
    pub data: WidgetData,
}

impl WidgetRecord {
    pub fn new(id: WidgetId, node: NodeId, container: Option<NodeId>, data: WidgetData) -> Self {
        Self {
            id,
            node,
            container,
            data,
        }
    }
}

/// Kind specific part of a [`WidgetRecord`].
#[derive(Debug, Clone)]
pub enum WidgetData {
    Button { text: String },
    /// The record tracks the hashed inner element; the wrapper holding the
    /// shadows is its parent.
    Banner,
    Accordion { items: Vec<NodeId> },
    ImageTextZone { image: String, text: String },
    Slider(SliderData),
    RateSlider(RateSliderData),
    Grid(GridData),
    Scroller(ScrollerData),
    LabelList(LabelListData),
    ResultList(ResultListData),
}

impl WidgetData {
    /// Short name of the widget kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Button { .. } => "button",
            Self::Banner => "banner",
            Self::Accordion { .. } => "accordion",
            Self::ImageTextZone { .. } => "imageTextZone",
            Self::Slider(_) => "slider",
            Self::RateSlider(_) => "rateSlider",
            Self::Grid(_) => "grid",
            Self::Scroller(_) => "scroller",
            Self::LabelList(_) => "labelList",
            Self::ResultList(_) => "resultList",
        }
    }

    pub fn as_slider(&self) -> Option<&SliderData> {
        match self {
            Self::Slider(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_slider_mut(&mut self) -> Option<&mut SliderData> {
        match self {
            Self::Slider(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_rate_slider(&self) -> Option<&RateSliderData> {
        match self {
            Self::RateSlider(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_rate_slider_mut(&mut self) -> Option<&mut RateSliderData> {
        match self {
            Self::RateSlider(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridData> {
        match self {
            Self::Grid(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_grid_mut(&mut self) -> Option<&mut GridData> {
        match self {
            Self::Grid(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_scroller(&self) -> Option<&ScrollerData> {
        match self {
            Self::Scroller(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_scroller_mut(&mut self) -> Option<&mut ScrollerData> {
        match self {
            Self::Scroller(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_label_list(&self) -> Option<&LabelListData> {
        match self {
            Self::LabelList(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_label_list_mut(&mut self) -> Option<&mut LabelListData> {
        match self {
            Self::LabelList(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_result_list(&self) -> Option<&ResultListData> {
        match self {
            Self::ResultList(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_result_list_mut(&mut self) -> Option<&mut ResultListData> {
        match self {
            Self::ResultList(data) => Some(data),
            _ => None,
        }
    }
}

/// Identifier stored in the `data-hash` attribute of `node`, if any.
pub fn hash_of(doc: &Document, node: NodeId) -> Option<WidgetId> {
    doc.data(node, "hash").and_then(WidgetId::parse)
}

/// All widget records of a runtime, looked up by identifier.
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<WidgetId, WidgetRecord>,
    /// Construction order, for iteration.
    order: Vec<WidgetId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record and hand it back.
    ///
    /// Identifiers are generated once per instance, so a second record with
    /// the same id replaces the first one.
    pub fn record(&mut self, entry: WidgetRecord) -> &WidgetRecord {
        let id = entry.id;
        if self.records.insert(id, entry).is_some() {
            log::warn!("replacing existing record for {id}");
        } else {
            self.order.push(id);
        }
        &self.records[&id]
    }

    pub fn find(&self, id: &WidgetId) -> Option<&WidgetRecord> {
        self.records.get(id)
    }

    pub fn find_mut(&mut self, id: &WidgetId) -> Option<&mut WidgetRecord> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.records.contains_key(id)
    }

    pub fn remove(&mut self, id: &WidgetId) -> Option<WidgetRecord> {
        let record = self.records.remove(id)?;
        self.order.retain(|other| other != id);
        Some(record)
    }

    /// Records in construction order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-read the volatile fields of the record owning `node` from the
    /// document: the node itself, its container and every node-list field.
    ///
    /// Does nothing if `node` carries no identifier or the identifier has no
    /// record. Running it twice gives the same result as running it once.
    pub fn refresh(&mut self, doc: &Document, node: NodeId) {
        let Some(id) = hash_of(doc, node) else {
            return;
        };
        let Some(record) = self.records.get_mut(&id) else {
            return;
        };

        record.node = node;
        record.container = match record.data {
            WidgetData::Banner => doc.parent(node).and_then(|wrapper| doc.parent(wrapper)),
            _ => doc.parent(node),
        };

        match &mut record.data {
            WidgetData::Grid(grid) => {
                grid.items = children_with_class(doc, node, "gridItem");
                grid.selection.selected = grid
                    .items
                    .iter()
                    .filter(|&&item| doc.has_class(item, "selected"))
                    .filter_map(|&item| hash_of(doc, item))
                    .collect();
            }
            WidgetData::Slider(slider) => {
                let zones = doc.select(node, ".subSlideZone").unwrap_or_default();
                for (sub, zone) in slider.sub_sliders.iter_mut().zip(zones) {
                    sub.node = zone;
                }
            }
            WidgetData::RateSlider(rate) => {
                rate.items = children_with_class(doc, node, "rateItem");
            }
            WidgetData::Accordion { items } => {
                *items = doc.select(node, ".accordionItem").unwrap_or_default();
            }
            WidgetData::ResultList(list) => {
                list.nav_buttons = doc.element_children(node);
            }
            WidgetData::Button { .. }
            | WidgetData::Banner
            | WidgetData::ImageTextZone { .. }
            | WidgetData::Scroller(_)
            | WidgetData::LabelList(_) => {}
        }
        log::debug!("refreshed {} {id}", record.data.kind());
    }
}

fn children_with_class(doc: &Document, node: NodeId, class: &str) -> Vec<NodeId> {
    doc.element_children(node)
        .into_iter()
        .filter(|&child| doc.has_class(child, class))
        .collect()
}
