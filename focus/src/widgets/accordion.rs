//! Row of collapsible cells.

use serde::Deserialize;

use crate::descriptor::{lenient, Common};
use crate::id::WidgetId;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_accordion";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccordionDescriptor {
    #[serde(flatten)]
    pub common: Common,
    #[serde(deserialize_with = "lenient")]
    pub nb_cols: usize,
    /// Markup shown while a cell is collapsed.
    #[serde(deserialize_with = "lenient")]
    pub placeholder_unactive: String,
    /// Markup shown while a cell is expanded.
    #[serde(deserialize_with = "lenient")]
    pub active_content: String,
    /// CSS height of the table.
    #[serde(deserialize_with = "lenient")]
    pub height: Option<String>,
}

impl AccordionDescriptor {
    fn markup(&self, id: WidgetId) -> String {
        let style = match &self.height {
            Some(height) => format!(" style=\"height:{height}\""),
            None => String::new(),
        };
        let mut html = format!(
            "<table{}{} data-hash=\"{id}\"{style}><tr>",
            self.common.class_attr(),
            self.common.id_attr(),
        );
        for col in 0..self.nb_cols {
            let class = if col + 1 == self.nb_cols {
                "accordionItem last"
            } else {
                "accordionItem"
            };
            html.push_str(&format!(
                "<td class=\"{class}\" data-hash=\"{}\">\
                 <div class=\"accordionPlaceholder\" data-hash=\"{}\">{}</div>\
                 <div class=\"accordionContent\" data-hash=\"{}\">{}</div>\
                 </td>",
                WidgetId::new(),
                WidgetId::new(),
                self.placeholder_unactive,
                WidgetId::new(),
                self.active_content,
            ));
        }
        html.push_str("</tr></table>");
        html
    }
}

#[derive(Debug, Clone)]
pub struct Accordion {
    ids: Vec<WidgetId>,
}

impl Accordion {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: AccordionDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        let containers = descriptor.common.restrict(rt.containers(container));

        let mut ids = Vec::new();
        for container in containers {
            let id = WidgetId::new();
            let mounted = mount(
                rt,
                id,
                &descriptor.markup(id),
                container,
                position,
                &descriptor.common.listeners,
                |_, _| WidgetData::Accordion { items: Vec::new() },
            );
            if mounted.is_some() {
                ids.push(id);
            }
        }
        Self { ids }
    }
}

impl Widget for Accordion {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
