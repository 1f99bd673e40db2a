//! Arrow that scrolls its container from target to target.

use std::ops::ControlFlow;
use std::time::Duration;

use serde::Deserialize;

use focusdom::{Event, EventType, NodeId};

use crate::descriptor::{css_px, lenient_vec, Common};
use crate::id::WidgetId;
use crate::listener::Listener;
use crate::registry::WidgetData;
use crate::runtime::scheduler::TimerId;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_scroller";
pub const ARROW_SRC: &str = "images/scroller_arrow_down.png";

/// Tick of [`smooth_scroll_by`].
pub const SMOOTH_SCROLL_PERIOD: Duration = Duration::from_millis(100);
/// Share of the remaining distance covered per tick.
const SMOOTH_SCROLL_FACTOR: f64 = 0.3;
/// Distance of the arrow from the bottom of the viewport.
const ARROW_MARGIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Down,
    Up,
}

impl Direction {
    pub fn class(self) -> &'static str {
        match self {
            Self::Down => "goingDown",
            Self::Up => "goingUp",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollerDescriptor {
    #[serde(flatten)]
    pub common: Common,
    /// Selectors of the elements the arrow stops at.
    #[serde(deserialize_with = "lenient_vec")]
    pub targets: Vec<String>,
}

impl ScrollerDescriptor {
    fn markup(&self, id: WidgetId, index: usize) -> String {
        format!(
            "<img{} src=\"{ARROW_SRC}\" alt=\"scroller_arrow\" data-index=\"{index}\"{} data-hash=\"{id}\">",
            self.common.id_attr(),
            self.common.class_attr(),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollerData {
    pub targets: Vec<String>,
    pub direction: Direction,
    /// Scroll position seen by the last scroll event.
    pub previous_top: f64,
}

/// Scroll `area` by the given distances over several ticks.
///
/// Every tick covers 30 % of the remaining distance, at least one pixel,
/// and dispatches a scroll event at `area`. The interval stops once the
/// final position is reached or the position no longer changes.
pub fn smooth_scroll_by(rt: &mut Runtime, area: NodeId, top: f64, left: f64) -> TimerId {
    let start = rt.document().scroll(area);
    let final_top = start.top + top;
    let final_left = start.left + left;

    rt.set_interval(SMOOTH_SCROLL_PERIOD, move |rt| {
        let current = rt.document().scroll(area);
        let next_top = current.top + step((final_top - current.top) * SMOOTH_SCROLL_FACTOR);
        let next_left = current.left + step((final_left - current.left) * SMOOTH_SCROLL_FACTOR);
        if !rt.document_mut().set_scroll_position(area, next_top, next_left) {
            return ControlFlow::Break(());
        }
        rt.dispatch(Event::new(EventType::Scroll, area));

        let now = rt.document().scroll(area);
        let reached_top = if top >= 0.0 {
            now.top >= final_top
        } else {
            now.top <= final_top
        };
        let reached_left = if left >= 0.0 {
            now.left >= final_left
        } else {
            now.left <= final_left
        };
        if reached_top && reached_left {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
}

/// Scroll increments between -1 and 1 are rounded away from zero.
fn step(increment: f64) -> f64 {
    if increment == 0.0 {
        0.0
    } else if increment.abs() < 1.0 {
        increment.signum()
    } else {
        increment
    }
}

fn viewport_height(rt: &Runtime, area: NodeId) -> f64 {
    let doc = rt.document();
    if area == doc.body() {
        return doc.client_height(doc.root());
    }
    doc.style(area)
        .px("height")
        .unwrap_or_else(|| doc.client_height(area))
}

fn scroller_data(rt: &Runtime, id: WidgetId) -> Option<&ScrollerData> {
    rt.registry().find(&id)?.data.as_scroller()
}

/// Top offsets of the targets inside the container, sorted ascending.
fn positions(rt: &Runtime, id: WidgetId, relative: bool) -> Vec<f64> {
    let (Some(record), Some(data)) = (rt.registry().find(&id), scroller_data(rt, id)) else {
        return Vec::new();
    };
    let Some(area) = record.container else {
        return Vec::new();
    };
    let doc = rt.document();
    let offset = if relative { doc.scroll_top(area) } else { 0.0 };
    let mut positions: Vec<f64> = data
        .targets
        .iter()
        .flat_map(|selector| match doc.select(area, selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::error!("invalid scroller target {selector:?}: {err}");
                Vec::new()
            }
        })
        .map(|target| doc.position_in_area(target, area).top - offset)
        .collect();
    positions.sort_by(f64::total_cmp);
    positions
}

fn set_direction(rt: &mut Runtime, id: WidgetId, direction: Direction) {
    let Some(record) = rt.registry_mut().find_mut(&id) else {
        return;
    };
    let node = record.node;
    if let Some(data) = record.data.as_scroller_mut() {
        data.direction = direction;
    }
    let other = match direction {
        Direction::Down => Direction::Up,
        Direction::Up => Direction::Down,
    };
    rt.remove_class(node, other.class());
    rt.add_class(node, direction.class());
}

fn on_click(rt: &mut Runtime, id: WidgetId) {
    let Some(area) = rt.registry().find(&id).and_then(|r| r.container) else {
        return;
    };
    let direction = scroller_data(rt, id).map(|d| d.direction).unwrap_or_default();
    let positions = positions(rt, id, true);
    let next = match direction {
        Direction::Up => positions.into_iter().rev().find(|&p| p < 0.0),
        Direction::Down => positions.into_iter().find(|&p| p > 0.0),
    };
    if let Some(distance) = next {
        log::debug!("scroller {id}: scrolling {distance}px");
        smooth_scroll_by(rt, area, distance, 0.0);
    }
}

fn on_scroll(rt: &mut Runtime, id: WidgetId, area: NodeId) {
    let Some(record) = rt.registry().find(&id) else {
        return;
    };
    let node = record.node;
    let Some(data) = record.data.as_scroller() else {
        return;
    };
    let previous = data.previous_top;
    let mut direction = data.direction;

    let scroll = rt.document().scroll(area);
    let top = scroll.top;
    let targets = positions(rt, id, false);
    if top > previous {
        direction = Direction::Down;
    } else if top < previous {
        direction = Direction::Up;
    }
    if top == 0.0 || targets.first().is_some_and(|&highest| top <= highest) {
        direction = Direction::Down;
    }
    let scrollable = scroll.content_height > scroll.client_height;
    if (scrollable && scroll.at_bottom()) || targets.last().is_some_and(|&lowest| top >= lowest) {
        direction = Direction::Up;
    }
    set_direction(rt, id, direction);

    let arrow_top = viewport_height(rt, area) - ARROW_MARGIN + top;
    rt.document_mut().set_style(node, "top", css_px(arrow_top));
    if let Some(data) = rt
        .registry_mut()
        .find_mut(&id)
        .and_then(|r| r.data.as_scroller_mut())
    {
        data.previous_top = top;
    }
}

#[derive(Debug, Clone)]
pub struct Scroller {
    ids: Vec<WidgetId>,
}

impl Scroller {
    /// The arrow is always inserted as the first child of each container.
    pub fn new(rt: &mut Runtime, container: Option<&str>, mut descriptor: ScrollerDescriptor) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        descriptor.common.add_base_class(Direction::Down.class());
        let containers = descriptor.common.restrict(rt.containers(container));

        let mut ids = Vec::new();
        for (index, container) in containers.into_iter().enumerate() {
            let id = WidgetId::new();
            let mut listeners = descriptor.common.listeners.clone();
            listeners.push(Listener::new(EventType::Click, move |rt: &mut Runtime, _: &Event| {
                on_click(rt, id)
            }));
            let targets = descriptor.targets.clone();
            let Some(node) = mount(
                rt,
                id,
                &descriptor.markup(id, index),
                container,
                Some(0),
                &listeners,
                |_, _| {
                    WidgetData::Scroller(ScrollerData {
                        targets,
                        ..ScrollerData::default()
                    })
                },
            ) else {
                continue;
            };

            let top = viewport_height(rt, container) - ARROW_MARGIN;
            rt.document_mut().set_style(node, "top", css_px(top));
            rt.bind_for(
                id,
                container,
                [Listener::new(EventType::Scroll, move |rt: &mut Runtime, event: &Event| {
                    on_scroll(rt, id, event.current_target)
                })],
            );
            ids.push(id);
        }
        Self { ids }
    }

    /// Add a target selector to every instance.
    pub fn add_target(&self, rt: &mut Runtime, selector: &str) {
        for id in self.ids() {
            let Some(data) = rt
                .registry_mut()
                .find_mut(id)
                .and_then(|r| r.data.as_scroller_mut())
            else {
                continue;
            };
            if !data.targets.iter().any(|t| t == selector) {
                data.targets.push(selector.to_string());
            }
        }
    }

    pub fn remove_target(&self, rt: &mut Runtime, selector: &str) {
        for id in self.ids() {
            if let Some(data) = rt
                .registry_mut()
                .find_mut(id)
                .and_then(|r| r.data.as_scroller_mut())
            {
                data.targets.retain(|t| t != selector);
            }
        }
    }

    /// Sorted top offsets of the targets of the `index`-th instance inside
    /// its container. With `relative` they are measured from the current
    /// scroll position.
    pub fn target_positions(&self, rt: &Runtime, index: usize, relative: bool) -> Vec<f64> {
        match self.ids.get(index) {
            Some(&id) => positions(rt, id, relative),
            None => Vec::new(),
        }
    }

    pub fn direction(&self, rt: &Runtime, id: WidgetId) -> Option<Direction> {
        scroller_data(rt, id).map(|d| d.direction)
    }
}

impl Widget for Scroller {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
