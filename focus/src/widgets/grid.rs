//! Grid of items, optionally checkable.
//!
//! Items are `div.gridItem` children of the grid element. Each one records
//! the grid it was built for in `data-gridofbelonging`. Contents are either
//! markup or an existing widget, which is moved into the item by
//! serializing it, detaching it and reinserting the markup.

use serde::{Deserialize, Deserializer};

use focusdom::markup::escape_attr;
use focusdom::{Event, EventType, NodeId};

use crate::descriptor::{lenient, lenient_vec, Common};
use crate::error::FocusError;
use crate::id::WidgetId;
use crate::listener::Listener;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::selection::{Selection, SelectionMode};
use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_grid";
/// Alternative base class laying items out as a list.
pub const LIST_CLASS: &str = "listAlikeGrid";

/// Content of a grid item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemContent {
    Html(String),
    /// A generated widget, moved into the item.
    Widget(WidgetId),
}

impl<'de> Deserialize<'de> for ItemContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Html)
    }
}

impl From<&str> for ItemContent {
    fn from(html: &str) -> Self {
        Self::Html(html.to_string())
    }
}

impl From<WidgetId> for ItemContent {
    fn from(id: WidgetId) -> Self {
        Self::Widget(id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GridItemDescriptor {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    /// CSS width. Without one the item wraps its content.
    #[serde(deserialize_with = "lenient")]
    pub width: Option<String>,
    /// CSS height, defaults to the width.
    #[serde(deserialize_with = "lenient")]
    pub height: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub content: Option<ItemContent>,
}

impl GridItemDescriptor {
    pub fn with_content(content: impl Into<ItemContent>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridDescriptor {
    #[serde(flatten)]
    pub common: Common,
    #[serde(deserialize_with = "lenient")]
    pub item_width: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub item_height: Option<String>,
    /// Number of empty items, ignored when `contents` is not empty.
    #[serde(deserialize_with = "lenient")]
    pub nb_items: usize,
    /// `"single"`, `"multiple"`, anything else disables selection.
    #[serde(deserialize_with = "lenient")]
    pub checkable: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub contents: Vec<GridItemDescriptor>,
}

impl GridDescriptor {
    pub fn mode(&self) -> SelectionMode {
        SelectionMode::from_checkable(&self.checkable)
    }

    fn item_templates(&self) -> Vec<GridItemDescriptor> {
        if !self.contents.is_empty() {
            return self.contents.clone();
        }
        let template = GridItemDescriptor {
            width: self.item_width.clone(),
            height: self.item_height.clone(),
            ..GridItemDescriptor::default()
        };
        vec![template; self.nb_items]
    }
}

#[derive(Debug, Clone, Default)]
pub struct GridData {
    pub items: Vec<NodeId>,
    pub selection: Selection<WidgetId>,
}

/// Markup of a content. Widgets are detached from where they are.
fn content_markup(rt: &mut Runtime, content: Option<&ItemContent>) -> String {
    match content {
        None => String::new(),
        Some(ItemContent::Html(html)) => html.clone(),
        Some(ItemContent::Widget(id)) => match rt.widget_root(*id) {
            Some(root) => {
                let html = rt.document().outer_html(root);
                rt.document_mut().detach(root);
                html
            }
            None => {
                log::warn!("grid content {id} is not a known widget");
                String::new()
            }
        },
    }
}

fn build_item(item: &GridItemDescriptor, content: &str, index: usize, grid: WidgetId) -> String {
    let id = match &item.id {
        Some(id) => format!(" id=\"{}\"", escape_attr(id)),
        None => String::new(),
    };
    let style = match (&item.width, &item.height) {
        (None, None) => String::new(),
        (width, height) => {
            let width = width.as_deref().unwrap_or_default();
            let height = height.as_deref().unwrap_or(width);
            format!(" style=\"width:{}; height:{};\"", escape_attr(width), escape_attr(height))
        }
    };
    format!(
        "<div class=\"gridItem\"{id} data-index=\"{index}\" data-hash=\"{}\" \
         data-gridofbelonging=\"{grid}\"{style}>{content}</div>",
        WidgetId::new()
    )
}

fn grid_data(rt: &Runtime, grid: WidgetId) -> Option<&GridData> {
    rt.registry().find(&grid)?.data.as_grid()
}

fn grid_data_mut(rt: &mut Runtime, grid: WidgetId) -> Option<&mut GridData> {
    rt.registry_mut().find_mut(&grid)?.data.as_grid_mut()
}

/// Put the `selected` class on exactly the selected items.
fn sync_selection(rt: &mut Runtime, grid: WidgetId) {
    let Some(data) = grid_data(rt, grid) else {
        return;
    };
    let items = data.items.clone();
    let selected = data.selection.selected.clone();
    for item in items {
        let is_selected = rt
            .widget_id_of(item)
            .is_some_and(|hash| selected.contains(&hash));
        if is_selected {
            rt.add_class(item, "selected");
        } else {
            rt.remove_class(item, "selected");
        }
    }
}

fn toggle_item(rt: &mut Runtime, grid: WidgetId, item: NodeId) {
    let Some(hash) = rt.widget_id_of(item) else {
        return;
    };
    let changed = grid_data_mut(rt, grid).is_some_and(|data| data.selection.toggle(hash));
    if changed {
        sync_selection(rt, grid);
        log::debug!("grid {grid}: toggled {hash}");
    }
}

fn selection_listener(grid: WidgetId) -> Listener {
    Listener::new(EventType::Click, move |rt: &mut Runtime, event: &Event| {
        toggle_item(rt, grid, event.current_target)
    })
}

/// Handle on one grid item element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridItem(pub NodeId);

impl GridItem {
    pub fn node(&self) -> NodeId {
        self.0
    }

    /// Identifier of the grid the item was built for.
    pub fn grid(&self, rt: &Runtime) -> Option<WidgetId> {
        rt.document()
            .data(self.0, "gridofbelonging")
            .and_then(WidgetId::parse)
    }

    /// Insert content into the item. Markup is wrapped in a hashed span.
    pub fn add_content(
        &self,
        rt: &mut Runtime,
        content: ItemContent,
        position: Option<usize>,
    ) -> Result<NodeId, FocusError> {
        let markup = match content {
            ItemContent::Html(html) => format!("<span data-hash=\"{}\">{html}</span>", WidgetId::new()),
            ItemContent::Widget(id) => {
                let root = rt.widget_root(id).ok_or(FocusError::UnknownWidget(id))?;
                let html = rt.document().outer_html(root);
                rt.document_mut().detach(root);
                html
            }
        };
        rt.insert(&markup, self.0, position)
    }

    pub fn clear_content(&self, rt: &mut Runtime) {
        rt.document_mut().clear_children(self.0);
    }

    /// Set the CSS size of the item.
    pub fn modify(&self, rt: &mut Runtime, width: &str, height: &str) {
        let doc = rt.document_mut();
        doc.set_style(self.0, "height", height);
        doc.set_style(self.0, "width", width);
    }

    /// Select the item. Single mode grids deselect the others. Grids that
    /// are not checkable ignore it.
    pub fn select(&self, rt: &mut Runtime) -> bool {
        let (Some(grid), Some(hash)) = (self.grid(rt), rt.widget_id_of(self.0)) else {
            return false;
        };
        let changed = grid_data_mut(rt, grid).is_some_and(|data| data.selection.select(hash));
        sync_selection(rt, grid);
        changed
    }

    pub fn unselect(&self, rt: &mut Runtime) -> bool {
        let (Some(grid), Some(hash)) = (self.grid(rt), rt.widget_id_of(self.0)) else {
            return false;
        };
        let changed = grid_data_mut(rt, grid).is_some_and(|data| data.selection.deselect(&hash));
        sync_selection(rt, grid);
        changed
    }

    pub fn is_selected(&self, rt: &Runtime) -> bool {
        rt.has_class(self.0, "selected")
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    ids: Vec<WidgetId>,
    mode: SelectionMode,
}

impl Grid {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: GridDescriptor,
        position: Option<usize>,
    ) -> Self {
        if !descriptor.common.has_class(LIST_CLASS) {
            descriptor.common.add_base_class(BASE_CLASS);
        }
        let mode = descriptor.mode();
        let containers = descriptor.common.restrict(rt.containers(container));
        let templates = descriptor.item_templates();

        let mut ids = Vec::new();
        for (index, container) in containers.into_iter().enumerate() {
            let id = WidgetId::new();
            let mut html = format!(
                "<div{}{} data-hash=\"{id}\" data-index=\"{index}\">",
                descriptor.common.id_attr(),
                descriptor.common.class_attr(),
            );
            for (i, item) in templates.iter().enumerate() {
                let content = content_markup(rt, item.content.as_ref());
                html.push_str(&build_item(item, &content, i, id));
            }
            html.push_str("</div>");

            let mounted = mount(
                rt,
                id,
                &html,
                container,
                position,
                &descriptor.common.listeners,
                |_, _| {
                    WidgetData::Grid(GridData {
                        items: Vec::new(),
                        selection: Selection::new(mode),
                    })
                },
            );
            if mounted.is_none() {
                continue;
            }
            if mode != SelectionMode::None {
                let items = grid_data(rt, id).map(|d| d.items.clone()).unwrap_or_default();
                for item in items {
                    rt.bind(item, [selection_listener(id)]);
                }
            }
            ids.push(id);
        }
        Self { ids, mode }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Add an item to one grid or to all of them, bind `listeners` on it and
    /// return the new items. `data-index` is the position, or the item count
    /// when appending.
    pub fn add_item(
        &self,
        rt: &mut Runtime,
        item: GridItemDescriptor,
        listeners: Vec<Listener>,
        position: Option<usize>,
        target: Option<WidgetId>,
    ) -> Vec<GridItem> {
        let mut added = Vec::new();
        for grid in self.targets(target) {
            let Some(node) = rt.registry().find(&grid).map(|r| r.node) else {
                continue;
            };
            let count = grid_data(rt, grid).map_or(0, |d| d.items.len());
            let index = position.unwrap_or(count);
            let content = content_markup(rt, item.content.as_ref());
            let markup = build_item(&item, &content, index, grid);
            let inserted = match rt.insert(&markup, node, position) {
                Ok(inserted) => inserted,
                Err(err) => {
                    log::error!("could not add item to grid {grid}: {err}");
                    continue;
                }
            };

            let mut bound = listeners.clone();
            if self.mode != SelectionMode::None {
                bound.push(selection_listener(grid));
            }
            rt.bind(inserted, bound);
            rt.refresh(node);
            added.push(GridItem(inserted));
        }
        added
    }

    /// Remove the item at `position` from one grid or all of them. Other
    /// items keep their `data-index` until [`Grid::update_item_indexes`].
    pub fn remove_item(&self, rt: &mut Runtime, position: usize, target: Option<WidgetId>) {
        for grid in self.targets(target) {
            let Some(node) = rt.registry().find(&grid).map(|r| r.node) else {
                continue;
            };
            let Some(item) = grid_data(rt, grid).and_then(|d| d.items.get(position).copied()) else {
                log::warn!("grid {grid} has no item at {position}");
                continue;
            };
            rt.document_mut().detach(item);
            rt.refresh(node);
        }
    }

    /// Fill the items in order with `contents`. Extra contents are ignored,
    /// extra items stay as they are.
    pub fn populate(&self, rt: &mut Runtime, contents: &[ItemContent], target: Option<WidgetId>) {
        for grid in self.targets(target) {
            for (item, content) in self.items(rt, Some(grid)).into_iter().zip(contents) {
                if let Err(err) = item.add_content(rt, content.clone(), None) {
                    log::error!("could not populate grid {grid}: {err}");
                }
            }
        }
    }

    /// Renumber `data-index` of the items from zero.
    pub fn update_item_indexes(&self, rt: &mut Runtime, target: Option<WidgetId>) {
        for grid in self.targets(target) {
            for (index, item) in self.items(rt, Some(grid)).into_iter().enumerate() {
                rt.document_mut().set_data(item.0, "index", index.to_string());
            }
        }
    }

    pub fn items(&self, rt: &Runtime, target: Option<WidgetId>) -> Vec<GridItem> {
        self.targets(target)
            .into_iter()
            .filter_map(|grid| grid_data(rt, grid))
            .flat_map(|data| data.items.iter().copied().map(GridItem))
            .collect()
    }

    /// Selected items of one grid, in document order.
    pub fn selected(&self, rt: &Runtime, grid: WidgetId) -> Vec<GridItem> {
        let Some(data) = grid_data(rt, grid) else {
            return Vec::new();
        };
        data.items
            .iter()
            .copied()
            .filter(|&item| {
                rt.widget_id_of(item)
                    .is_some_and(|hash| data.selection.is_selected(&hash))
            })
            .map(GridItem)
            .collect()
    }
}

impl Widget for Grid {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
