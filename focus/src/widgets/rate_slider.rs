//! Star rating.

use serde::Deserialize;

use focusdom::{Event, EventType, NodeId};

use crate::descriptor::{lenient, lenient_or, Common};
use crate::id::WidgetId;
use crate::listener::Listener;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_rateSlider";
pub const DEFAULT_PATTERN: &str = "&#9733;";
pub const DEFAULT_ACTIVE_COLOR: &str = "rgb(255, 221, 153)";
pub const INACTIVE_COLOR: &str = "rgb(190, 190, 190)";
const DEFAULT_MAX_RATE: u32 = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RateSliderDescriptor {
    #[serde(flatten)]
    pub common: Common,
    #[serde(deserialize_with = "lenient_max_rate")]
    pub max_rate: u32,
    #[serde(deserialize_with = "lenient")]
    pub initial_value: Option<u32>,
    /// Disable hover preview and click rating.
    #[serde(deserialize_with = "lenient")]
    pub read_only: bool,
    /// Markup of one rate item.
    #[serde(deserialize_with = "lenient_pattern")]
    pub pattern: String,
    /// Colour of the items up to the rate.
    #[serde(deserialize_with = "lenient_active_color")]
    pub active_color: String,
}

fn lenient_max_rate<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_or(deserializer, DEFAULT_MAX_RATE)
}

fn lenient_pattern<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient_or(deserializer, DEFAULT_PATTERN.to_string())
}

fn lenient_active_color<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    lenient_or(deserializer, DEFAULT_ACTIVE_COLOR.to_string())
}

impl Default for RateSliderDescriptor {
    fn default() -> Self {
        Self {
            common: Common::default(),
            max_rate: DEFAULT_MAX_RATE,
            initial_value: None,
            read_only: false,
            pattern: DEFAULT_PATTERN.to_string(),
            active_color: DEFAULT_ACTIVE_COLOR.to_string(),
        }
    }
}

impl RateSliderDescriptor {
    fn markup(&self, id: WidgetId, index: usize) -> String {
        let mut html = format!(
            "<div{}{} data-hash=\"{id}\" data-index=\"{index}\">",
            self.common.id_attr(),
            self.common.class_attr(),
        );
        for rate in 1..=self.max_rate {
            html.push_str(&format!(
                "<div class=\"rateItem\" data-hash=\"{}\" data-rate=\"{rate}\">{}</div>",
                WidgetId::new(),
                self.pattern
            ));
        }
        html.push_str("</div>");
        html
    }
}

#[derive(Debug, Clone)]
pub struct RateSliderData {
    /// Stored rate. `None` until the user or the code rates.
    pub rate: Option<u32>,
    pub max_rate: u32,
    pub active_color: String,
    pub items: Vec<NodeId>,
}

/// Colour the first `rate` items with the active colour and the rest grey.
fn fill(rt: &mut Runtime, id: WidgetId, rate: u32) {
    let Some(data) = rt.registry().find(&id).and_then(|r| r.data.as_rate_slider()) else {
        return;
    };
    let items = data.items.clone();
    let active = data.active_color.clone();
    for (i, item) in items.into_iter().enumerate() {
        let color = if (i as u32) < rate {
            active.as_str()
        } else {
            INACTIVE_COLOR
        };
        rt.document_mut().set_style(item, "color", color);
    }
}

fn stored_rate(rt: &Runtime, id: WidgetId) -> u32 {
    rt.registry()
        .find(&id)
        .and_then(|r| r.data.as_rate_slider())
        .and_then(|d| d.rate)
        .unwrap_or(0)
}

fn item_rate(rt: &Runtime, item: NodeId) -> Option<u32> {
    rt.document().data(item, "rate")?.parse().ok()
}

fn store(rt: &mut Runtime, id: WidgetId, rate: u32) {
    if let Some(data) = rt
        .registry_mut()
        .find_mut(&id)
        .and_then(|r| r.data.as_rate_slider_mut())
    {
        data.rate = Some(rate.min(data.max_rate));
    }
}

fn bind_items(rt: &mut Runtime, id: WidgetId) {
    let items = rt
        .registry()
        .find(&id)
        .and_then(|r| r.data.as_rate_slider())
        .map(|d| d.items.clone())
        .unwrap_or_default();
    for item in items {
        rt.bind(
            item,
            [
                Listener::new(EventType::MouseEnter, move |rt: &mut Runtime, event: &Event| {
                    if let Some(rate) = item_rate(rt, event.current_target) {
                        fill(rt, id, rate);
                    }
                }),
                Listener::new(EventType::Click, move |rt: &mut Runtime, event: &Event| {
                    if let Some(rate) = item_rate(rt, event.current_target) {
                        store(rt, id, rate);
                        fill(rt, id, rate);
                    }
                }),
            ],
        );
    }
}

#[derive(Debug, Clone)]
pub struct RateSlider {
    ids: Vec<WidgetId>,
}

impl RateSlider {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: RateSliderDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        let containers = descriptor.common.restrict(rt.containers(container));
        let initial = descriptor.initial_value.map(|v| v.min(descriptor.max_rate));

        let mut ids = Vec::new();
        for (index, container) in containers.into_iter().enumerate() {
            let id = WidgetId::new();
            let mut listeners = descriptor.common.listeners.clone();
            listeners.push(Listener::new(EventType::MouseOut, move |rt: &mut Runtime, _: &Event| {
                let rate = stored_rate(rt, id);
                fill(rt, id, rate);
            }));

            let max_rate = descriptor.max_rate;
            let active_color = descriptor.active_color.clone();
            let mounted = mount(
                rt,
                id,
                &descriptor.markup(id, index),
                container,
                position,
                &listeners,
                |_, _| {
                    WidgetData::RateSlider(RateSliderData {
                        rate: initial,
                        max_rate,
                        active_color,
                        items: Vec::new(),
                    })
                },
            );
            if mounted.is_none() {
                continue;
            }
            fill(rt, id, initial.unwrap_or(0));
            if !descriptor.read_only {
                bind_items(rt, id);
            }
            ids.push(id);
        }
        Self { ids }
    }

    /// Store and display `rate` on one instance or all of them. Rates above
    /// the maximum are clamped.
    pub fn set_value(&self, rt: &mut Runtime, rate: u32, target: Option<WidgetId>) {
        for id in self.targets(target) {
            store(rt, id, rate);
            let rate = stored_rate(rt, id);
            fill(rt, id, rate);
        }
    }

    pub fn rate(&self, rt: &Runtime, id: WidgetId) -> Option<u32> {
        rt.registry().find(&id)?.data.as_rate_slider()?.rate
    }
}

impl Widget for RateSlider {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
