//! Draggable value slider with optional sub-zones.
//!
//! The track is the slider axis minus the width of the main cursor. The
//! main cursor's left offset in `[0, track]` maps linearly onto
//! `[min, max]`; the value is truncated toward zero. Sub-zones split the
//! main zone and their cursors move width from one neighbour to the other.

use serde::Deserialize;

use focusdom::markup::escape_attr;
use focusdom::{Event, EventType, NodeId};

use crate::descriptor::{css_px, lenient, lenient_or, lenient_vec, Common};
use crate::id::WidgetId;
use crate::listener::Listener;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_slider";

/// Width of the main cursor, subtracted from the axis to get the track.
pub const CURSOR_WIDTH: f64 = 12.0;

/// Sub-cursors are centred on the boundary between two zones.
const SUB_CURSOR_OFFSET: f64 = 10.0;

const DEFAULT_MAX: f64 = 100.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubSliderDescriptor {
    #[serde(deserialize_with = "lenient")]
    pub label: String,
    /// CSS background colour of the zone.
    #[serde(deserialize_with = "lenient")]
    pub color: String,
    #[serde(deserialize_with = "lenient")]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderDescriptor {
    #[serde(flatten)]
    pub common: Common,
    /// Title shown before the value.
    #[serde(deserialize_with = "lenient")]
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub value: f64,
    #[serde(deserialize_with = "lenient")]
    pub min: f64,
    #[serde(deserialize_with = "lenient_max")]
    pub max: f64,
    #[serde(deserialize_with = "lenient_vec")]
    pub sub_sliders: Vec<SubSliderDescriptor>,
}

impl Default for SliderDescriptor {
    fn default() -> Self {
        Self {
            common: Common::default(),
            label: String::new(),
            value: 0.0,
            min: 0.0,
            max: DEFAULT_MAX,
            sub_sliders: Vec::new(),
        }
    }
}

fn lenient_max<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    lenient_or(deserializer, DEFAULT_MAX)
}

impl SliderDescriptor {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            value: min,
            ..Self::default()
        }
    }

    /// Swap inverted bounds and bring the initial value into range.
    pub fn normalize(&mut self) {
        if self.min > self.max {
            log::warn!("slider min {} > max {}, swapping", self.min, self.max);
            std::mem::swap(&mut self.min, &mut self.max);
        }
        if !self.value.is_finite() {
            self.value = self.min;
        }
        self.value = self.value.clamp(self.min, self.max);
    }

    fn markup(&self, id: WidgetId, index: usize) -> String {
        let label = if self.label.is_empty() {
            String::new()
        } else {
            format!("{}:", self.label)
        };
        let mut html = format!(
            "<div{}{} data-hash=\"{id}\" data-index=\"{index}\">\
             <span class=\"sliderTitleLabel\" data-hash=\"{}\">{label} \
             <span class=\"sliderValue\" data-hash=\"{}\">{}</span></span>\
             <div class=\"sliderCore\" data-hash=\"{}\">\
             <span class=\"minValue\" data-hash=\"{}\">{}</span>\
             <div class=\"sliderMechanics\" data-hash=\"{}\">\
             <div class=\"sliderAxis\" data-hash=\"{}\"></div>\
             <div class=\"dynamicItemsContainer\" data-hash=\"{}\">\
             <div class=\"mainSlideZone\" data-hash=\"{}\">",
            self.common.id_attr(),
            self.common.class_attr(),
            WidgetId::new(),
            WidgetId::new(),
            self.value,
            WidgetId::new(),
            WidgetId::new(),
            self.min,
            WidgetId::new(),
            WidgetId::new(),
            WidgetId::new(),
            WidgetId::new(),
        );
        let last = self.sub_sliders.len().saturating_sub(1);
        for (i, sub) in self.sub_sliders.iter().enumerate() {
            let style = if sub.color.is_empty() {
                String::new()
            } else {
                format!(" style=\"background-color: {};\"", escape_attr(&sub.color))
            };
            html.push_str(&format!(
                "<div class=\"subSlideZone\" data-hash=\"{}\" data-index=\"{i}\"{style}>{}</div>",
                WidgetId::new(),
                sub.label
            ));
            if i != last {
                html.push_str(&format!(
                    "<div class=\"subCursor\" data-hash=\"{}\" data-index=\"{i}\"></div>",
                    WidgetId::new()
                ));
            }
        }
        html.push_str(&format!(
            "</div>\
             <div class=\"mainCursor\" data-hash=\"{}\"></div>\
             </div></div>\
             <span class=\"maxValue\" data-hash=\"{}\">{}</span>\
             </div></div>",
            WidgetId::new(),
            WidgetId::new(),
            self.max
        ));
        html
    }
}

/// Live state of one sub-zone.
#[derive(Debug, Clone)]
pub struct SubSlider {
    pub node: NodeId,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct SliderData {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub sub_sliders: Vec<SubSlider>,
}

/// Value for a cursor at `pos` on a track of width `track`.
///
/// Truncated toward zero, then clamped to `[min, max]`. A track without
/// width maps everything to `min`.
pub fn value_at(pos: f64, track: f64, min: f64, max: f64) -> f64 {
    if track <= 0.0 {
        return min;
    }
    let raw = pos * (max - min) / track + min;
    // absorb float noise like 6.999999999 before truncating
    let raw = (raw * 1e9).round() / 1e9;
    raw.trunc().clamp(min, max) + 0.0
}

/// Element handles of one slider instance, looked up from the document.
struct Parts {
    root: NodeId,
    value_span: NodeId,
    axis: NodeId,
    dynamic: NodeId,
    main_zone: NodeId,
    main_cursor: NodeId,
    zones: Vec<NodeId>,
    sub_cursors: Vec<NodeId>,
}

impl Parts {
    fn find(rt: &Runtime, id: WidgetId) -> Option<Self> {
        let root = rt.registry().find(&id)?.node;
        let doc = rt.document();
        let first = |class: &str| doc.select_first(root, class).ok().flatten();
        Some(Self {
            root,
            value_span: first(".sliderValue")?,
            axis: first(".sliderAxis")?,
            dynamic: first(".dynamicItemsContainer")?,
            main_zone: first(".mainSlideZone")?,
            main_cursor: first(".mainCursor")?,
            zones: doc.select(root, ".subSlideZone").unwrap_or_default(),
            sub_cursors: doc.select(root, ".subCursor").unwrap_or_default(),
        })
    }

    fn track(&self, rt: &Runtime) -> f64 {
        rt.document().offset_width(self.axis) - CURSOR_WIDTH
    }
}

fn bounds(rt: &Runtime, id: WidgetId) -> Option<(f64, f64)> {
    let slider = rt.registry().find(&id)?.data.as_slider()?;
    Some((slider.min, slider.max))
}

/// Put the main cursor at `pos` and update everything that follows from it:
/// value, value display, main zone width and the even split of sub-zones.
fn apply_position(rt: &mut Runtime, id: WidgetId, pos: f64) {
    let (Some(parts), Some((min, max))) = (Parts::find(rt, id), bounds(rt, id)) else {
        return;
    };
    let value = value_at(pos, parts.track(rt), min, max);

    let doc = rt.document_mut();
    doc.set_style(parts.main_cursor, "left", css_px(pos));
    if doc.text_content(parts.value_span) != value.to_string() {
        doc.set_text(parts.value_span, &value.to_string());
    }
    doc.set_style(parts.main_zone, "width", css_px(pos));

    let n = parts.zones.len();
    if n > 0 {
        let share = pos / n as f64;
        for &zone in &parts.zones {
            doc.set_style(zone, "width", css_px(share));
        }
        for (i, &cursor) in parts.sub_cursors.iter().enumerate() {
            let left = (i + 1) as f64 * share - SUB_CURSOR_OFFSET;
            doc.set_style(cursor, "left", css_px(left));
        }
    }

    if let Some(slider) = rt
        .registry_mut()
        .find_mut(&id)
        .and_then(|r| r.data.as_slider_mut())
    {
        slider.value = value;
        if n > 0 {
            let sub_value = ((value - min) / n as f64).trunc();
            for sub in &mut slider.sub_sliders {
                sub.value = sub_value;
            }
        }
    }
    log::debug!("slider {id} at {pos} -> {value}");
}

/// Move the boundary between the two zones around a sub-cursor.
fn move_sub_cursor(rt: &mut Runtime, id: WidgetId, cursor: NodeId, movement: f64) {
    let Some(parts) = Parts::find(rt, id) else {
        return;
    };
    let Some(k) = parts.sub_cursors.iter().position(|&c| c == cursor) else {
        return;
    };
    let (Some(&left), Some(&right)) = (parts.zones.get(k), parts.zones.get(k + 1)) else {
        return;
    };

    let doc = rt.document_mut();
    let left_width = doc.offset_width(left);
    let right_width = doc.offset_width(right);
    let delta = movement.clamp(-left_width, right_width);
    doc.set_style(left, "width", css_px(left_width + delta));
    doc.set_style(right, "width", css_px(right_width - delta));
    let cursor_left = doc.offset_left(cursor) + delta;
    doc.set_style(cursor, "left", css_px(cursor_left));

    let main_width = doc.offset_width(parts.main_zone);
    let widths: Vec<f64> = parts.zones.iter().map(|&z| doc.offset_width(z)).collect();
    if let Some(slider) = rt
        .registry_mut()
        .find_mut(&id)
        .and_then(|r| r.data.as_slider_mut())
    {
        let span = slider.value - slider.min;
        for (sub, width) in slider.sub_sliders.iter_mut().zip(widths) {
            sub.value = if main_width > 0.0 {
                (width * span / main_width).round()
            } else {
                0.0
            };
        }
    }
}

fn on_press(rt: &mut Runtime, event: &Event) {
    rt.drag.stack.push(event.current_target);
    if event.kind.is_touch() {
        rt.drag.last_client_x = Some(event.client_x);
    }
}

fn on_release(rt: &mut Runtime, _event: &Event) {
    rt.drag.stack.clear();
    rt.drag.last_client_x = None;
}

fn on_move(rt: &mut Runtime, id: WidgetId, event: &Event) {
    let movement = match event.movement_x {
        Some(dx) => dx,
        None => {
            let previous = rt.drag.last_client_x.replace(event.client_x);
            previous.map_or(0.0, |x| event.client_x - x)
        }
    };
    let Some(&dragged) = rt.drag.stack.first() else {
        return;
    };
    let Some(parts) = Parts::find(rt, id) else {
        return;
    };
    if !rt.document().contains(parts.root, dragged) {
        return;
    }

    if dragged == parts.main_cursor {
        let track = parts.track(rt).max(0.0);
        let pos = (rt.document().offset_left(dragged) + movement).clamp(0.0, track);
        apply_position(rt, id, pos);
    } else if rt.has_class(dragged, "subCursor") {
        move_sub_cursor(rt, id, dragged, movement);
    }
}

fn on_track_click(rt: &mut Runtime, id: WidgetId, event: &Event) {
    let target = event.target;
    let doc = rt.document();
    if doc.closest_with_class(target, "mainCursor").is_some()
        || doc.closest_with_class(target, "subCursor").is_some()
    {
        return;
    }
    let Some(parts) = Parts::find(rt, id) else {
        return;
    };
    if rt.document().closest_with_class(target, "dynamicItemsContainer") != Some(parts.dynamic) {
        return;
    }
    let mut pos = event.offset_x;
    if target != parts.dynamic {
        pos += rt.document().position_in_area(target, parts.dynamic).left;
    }
    let pos = pos.clamp(0.0, parts.track(rt).max(0.0));
    apply_position(rt, id, pos);
}

fn bind_mechanics(rt: &mut Runtime, id: WidgetId) {
    let Some(parts) = Parts::find(rt, id) else {
        return;
    };

    let cursors = std::iter::once(parts.main_cursor).chain(parts.sub_cursors.iter().copied());
    for cursor in cursors.collect::<Vec<_>>() {
        rt.bind(
            cursor,
            [Listener::on([EventType::TouchStart, EventType::MouseDown], on_press)],
        );
    }

    rt.bind(
        parts.root,
        [
            Listener::on([EventType::TouchEnd, EventType::MouseUp], on_release),
            Listener::on(
                [EventType::TouchMove, EventType::MouseMove],
                move |rt: &mut Runtime, event: &Event| on_move(rt, id, event),
            ),
            Listener::new(EventType::MouseLeave, on_release),
        ],
    );

    rt.bind(
        parts.dynamic,
        [Listener::new(EventType::Click, move |rt: &mut Runtime, event: &Event| {
            on_track_click(rt, id, event)
        })],
    );
}

#[derive(Debug, Clone)]
pub struct Slider {
    ids: Vec<WidgetId>,
}

impl Slider {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: SliderDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        descriptor.normalize();
        let containers = descriptor.common.restrict(rt.containers(container));

        let mut ids = Vec::new();
        for (index, container) in containers.into_iter().enumerate() {
            let id = WidgetId::new();
            let sub_values: Vec<f64> = descriptor.sub_sliders.iter().map(|s| s.value).collect();
            let (value, min, max) = (descriptor.value, descriptor.min, descriptor.max);
            let mounted = mount(
                rt,
                id,
                &descriptor.markup(id, index),
                container,
                position,
                &descriptor.common.listeners,
                |doc, node| {
                    let zones = doc.select(node, ".subSlideZone").unwrap_or_default();
                    WidgetData::Slider(SliderData {
                        value,
                        min,
                        max,
                        sub_sliders: zones
                            .into_iter()
                            .zip(sub_values)
                            .map(|(node, value)| SubSlider { node, value })
                            .collect(),
                    })
                },
            );
            if mounted.is_some() {
                bind_mechanics(rt, id);
                ids.push(id);
            }
        }
        Self { ids }
    }

    /// Move the cursor of one slider, or of all of them, to `value` and run
    /// the track click path for the new position.
    pub fn set_value(&self, rt: &mut Runtime, value: f64, target: Option<WidgetId>) {
        for id in self.targets(target) {
            let (Some(parts), Some((min, max))) = (Parts::find(rt, id), bounds(rt, id)) else {
                continue;
            };
            let track = parts.track(rt).max(0.0);
            let pos = if max == min {
                0.0
            } else {
                ((value - min) * track / (max - min)).clamp(0.0, track)
            };
            rt.document_mut()
                .set_style(parts.main_cursor, "left", css_px(pos));
            rt.dispatch(Event::new(EventType::Click, parts.dynamic).offset(pos, 0.0));
        }
    }

    /// Current value of one instance.
    pub fn value(&self, rt: &Runtime, id: WidgetId) -> Option<f64> {
        Some(rt.registry().find(&id)?.data.as_slider()?.value)
    }
}

impl Widget for Slider {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_truncates_toward_zero() {
        assert_eq!(value_at(70.0, 100.0, 0.0, 10.0), 7.0);
        assert_eq!(value_at(79.0, 100.0, 0.0, 10.0), 7.0);
        assert_eq!(value_at(15.0, 100.0, -10.0, 0.0), -8.0);
    }

    #[test]
    fn value_clamped_to_bounds() {
        assert_eq!(value_at(120.0, 100.0, 0.0, 10.0), 10.0);
        assert_eq!(value_at(-5.0, 100.0, 0.0, 10.0), 0.0);
        assert_eq!(value_at(50.0, 0.0, 3.0, 10.0), 3.0);
    }

    #[test]
    fn normalize_swaps_and_clamps() {
        let mut descriptor = SliderDescriptor {
            min: 10.0,
            max: 0.0,
            value: 42.0,
            ..SliderDescriptor::default()
        };
        descriptor.normalize();
        assert_eq!((descriptor.min, descriptor.max, descriptor.value), (0.0, 10.0, 10.0));
    }
}
