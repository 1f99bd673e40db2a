//! Paginated result list.
//!
//! The widget only draws the page navigation: a previous button, one
//! button per page and a next button. Items of the selected page are handed
//! to a render callback, which puts them wherever the caller wants.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use focusdom::{Event, EventType, NodeId};

use crate::descriptor::{lenient_or, lenient_vec, Common};
use crate::id::WidgetId;
use crate::listener::Listener;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_ResultListDisplayer";
pub const ACTIVE_CLASS: &str = "activeButton";
const DEFAULT_PAGE_SIZE: usize = 10;

/// Callback receiving each item of a displayed page with its index in the
/// full list.
#[derive(Clone)]
pub struct RenderFn(Rc<dyn Fn(&mut Runtime, &Value, usize)>);

impl RenderFn {
    pub fn new(render: impl Fn(&mut Runtime, &Value, usize) + 'static) -> Self {
        Self(Rc::new(render))
    }

    fn call(&self, rt: &mut Runtime, item: &Value, index: usize) {
        (self.0)(rt, item, index)
    }
}

impl fmt::Debug for RenderFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderFn")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultListDescriptor {
    #[serde(flatten)]
    pub common: Common,
    #[serde(deserialize_with = "lenient_vec")]
    pub list: Vec<Value>,
    #[serde(deserialize_with = "lenient_page_size")]
    pub nb_el_per_page: usize,
    #[serde(skip)]
    pub render: Option<RenderFn>,
}

fn lenient_page_size<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    lenient_or(deserializer, DEFAULT_PAGE_SIZE)
}

impl Default for ResultListDescriptor {
    fn default() -> Self {
        Self {
            common: Common::default(),
            list: Vec::new(),
            nb_el_per_page: DEFAULT_PAGE_SIZE,
            render: None,
        }
    }
}

impl ResultListDescriptor {
    pub fn new(list: Vec<Value>, nb_el_per_page: usize) -> Self {
        Self {
            list,
            nb_el_per_page,
            ..Self::default()
        }
    }

    pub fn with_render(mut self, render: impl Fn(&mut Runtime, &Value, usize) + 'static) -> Self {
        self.render = Some(RenderFn::new(render));
        self
    }

    fn markup(&self, id: WidgetId, index: usize) -> String {
        let button = |label: &str| {
            format!(
                "<span data-hash=\"{}\" data-index=\"{index}\">{label}</span>",
                WidgetId::new()
            )
        };
        let mut html = format!(
            "<div{} data-hash=\"{id}\" data-index=\"{index}\"{}>",
            self.common.class_attr(),
            self.common.id_attr(),
        );
        html.push_str(&button("&lt;"));
        for page in 1..=page_count(self.list.len(), self.nb_el_per_page) {
            html.push_str(&button(&page.to_string()));
        }
        html.push_str(&button("&gt;"));
        html.push_str("</div>");
        html
    }
}

#[derive(Debug, Clone)]
pub struct ResultListData {
    pub items: Vec<Value>,
    pub page_size: usize,
    /// Page of the active button, starting at 1.
    pub current_page: usize,
    /// Page whose items were last handed to the render callback.
    pub rendered_page: Option<usize>,
    /// Previous button, page buttons, next button.
    pub nav_buttons: Vec<NodeId>,
    /// Indices of every item rendered so far.
    pub rendered: Vec<usize>,
    pub render: Option<RenderFn>,
}

impl ResultListData {
    pub fn page_count(&self) -> usize {
        page_count(self.items.len(), self.page_size)
    }
}

/// Number of pages needed for `total` items, `page_size` per page.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

fn list_data(rt: &Runtime, id: WidgetId) -> Option<&ResultListData> {
    rt.registry().find(&id)?.data.as_result_list()
}

/// Show `page`: move the active class and render its items. Pages outside
/// `[1, page_count]` and the page already shown are ignored.
fn go_to_page(rt: &mut Runtime, id: WidgetId, page: i64) {
    let Some(data) = list_data(rt, id) else {
        return;
    };
    let count = data.page_count();
    let Ok(page) = usize::try_from(page) else {
        return;
    };
    if page < 1 || page > count || data.rendered_page == Some(page) {
        return;
    }

    let label = page.to_string();
    let buttons = data.nav_buttons.clone();
    let start = (page - 1) * data.page_size;
    let end = (page * data.page_size).min(data.items.len());
    let items: Vec<(usize, Value)> = (start..end).map(|i| (i, data.items[i].clone())).collect();
    let render = data.render.clone();

    for &button in &buttons {
        rt.remove_class(button, ACTIVE_CLASS);
    }
    if let Some(&active) = buttons
        .iter()
        .find(|&&b| rt.document().text_content(b) == label)
    {
        rt.add_class(active, ACTIVE_CLASS);
    }

    if let Some(data) = rt
        .registry_mut()
        .find_mut(&id)
        .and_then(|r| r.data.as_result_list_mut())
    {
        data.current_page = page;
        data.rendered_page = Some(page);
        for &(i, _) in &items {
            if !data.rendered.contains(&i) {
                data.rendered.push(i);
            }
        }
    }
    log::debug!("result list {id}: page {page}/{count}");

    if let Some(render) = render {
        for (i, item) in &items {
            render.call(rt, item, *i);
        }
    }
}

fn on_nav_click(rt: &mut Runtime, id: WidgetId, event: &Event) {
    let label = rt.document().text_content(event.current_target);
    let label = label.trim();
    let Some(current) = list_data(rt, id).map(|d| d.current_page as i64) else {
        return;
    };
    let page = match label {
        "<" => current - 1,
        ">" => current + 1,
        other => match other.parse::<i64>() {
            Ok(page) => page,
            Err(_) => return,
        },
    };
    go_to_page(rt, id, page);
}

#[derive(Debug, Clone)]
pub struct ResultList {
    ids: Vec<WidgetId>,
}

impl ResultList {
    /// Build the navigation in each container. The first page of every
    /// instance is shown by a click on its first page button, scheduled
    /// with a zero delay.
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: ResultListDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        if descriptor.nb_el_per_page == 0 {
            log::warn!("result list page size 0, using 1");
            descriptor.nb_el_per_page = 1;
        }
        let containers = descriptor.common.restrict(rt.containers(container));

        let mut ids = Vec::new();
        for (index, container) in containers.into_iter().enumerate() {
            let id = WidgetId::new();
            let data = ResultListData {
                items: descriptor.list.clone(),
                page_size: descriptor.nb_el_per_page,
                current_page: 1,
                rendered_page: None,
                nav_buttons: Vec::new(),
                rendered: Vec::new(),
                render: descriptor.render.clone(),
            };
            let mounted = mount(
                rt,
                id,
                &descriptor.markup(id, index),
                container,
                position,
                &descriptor.common.listeners,
                |_, _| WidgetData::ResultList(data),
            );
            if mounted.is_none() {
                continue;
            }

            let buttons = list_data(rt, id).map(|d| d.nav_buttons.clone()).unwrap_or_default();
            for button in buttons {
                rt.bind(
                    button,
                    [Listener::new(EventType::Click, move |rt: &mut Runtime, event: &Event| {
                        on_nav_click(rt, id, event)
                    })],
                );
            }
            rt.set_timeout(Duration::ZERO, move |rt| {
                let first = list_data(rt, id).and_then(|d| d.nav_buttons.get(1).copied());
                if let Some(button) = first {
                    rt.fire(EventType::Click, button);
                }
            });
            ids.push(id);
        }
        Self { ids }
    }

    /// Show `page` on one instance or all of them.
    pub fn go_to(&self, rt: &mut Runtime, page: usize, target: Option<WidgetId>) {
        let page = i64::try_from(page).unwrap_or(i64::MAX);
        for id in self.targets(target) {
            go_to_page(rt, id, page);
        }
    }

    pub fn page_count(&self, rt: &Runtime, id: WidgetId) -> usize {
        list_data(rt, id).map_or(0, ResultListData::page_count)
    }

    pub fn current_page(&self, rt: &Runtime, id: WidgetId) -> Option<usize> {
        list_data(rt, id).map(|d| d.current_page)
    }

    /// Indices of the items rendered so far, in render order.
    pub fn rendered<'a>(&self, rt: &'a Runtime, id: WidgetId) -> &'a [usize] {
        match list_data(rt, id) {
            Some(data) => &data.rendered,
            None => &[],
        }
    }
}

impl Widget for ResultList {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
