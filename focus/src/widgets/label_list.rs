//! Inline list of coloured labels with an optional title.

use serde::Deserialize;

use focusdom::markup::{escape_attr, escape_text};

use crate::descriptor::{lenient, lenient_vec, Common};
use crate::id::WidgetId;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_labelList";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelListDescriptor {
    #[serde(flatten)]
    pub common: Common,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub labels: Vec<String>,
    /// Text colour of the labels.
    #[serde(deserialize_with = "lenient")]
    pub color: String,
    #[serde(deserialize_with = "lenient")]
    pub background_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelColors {
    pub background: String,
    pub text: String,
}

impl LabelColors {
    fn label_markup(&self, label: &str) -> String {
        let mut style = String::new();
        if !self.background.is_empty() {
            style.push_str(&format!("background-color: {};", escape_attr(&self.background)));
        }
        if !self.text.is_empty() {
            style.push_str(&format!(" color: {};", escape_attr(&self.text)));
        }
        let style = if style.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", style.trim_start())
        };
        format!(
            "<span class=\"label\" data-hash=\"{}\"{style}>{}</span>",
            WidgetId::new(),
            escape_text(label)
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelListData {
    pub labels: Vec<String>,
    pub colors: LabelColors,
}

#[derive(Debug, Clone)]
pub struct LabelList {
    ids: Vec<WidgetId>,
}

impl LabelList {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: LabelListDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        let containers = descriptor.common.restrict(rt.containers(container));
        let colors = LabelColors {
            background: descriptor.background_color.clone(),
            text: descriptor.color.clone(),
        };

        let mut ids = Vec::new();
        for container in containers {
            let id = WidgetId::new();
            let mut html = format!(
                "<div{} data-hash=\"{id}\"{}>",
                descriptor.common.class_attr(),
                descriptor.common.id_attr(),
            );
            if let Some(title) = descriptor.title.as_deref().filter(|t| !t.is_empty()) {
                html.push_str(&format!("<span class=\"title\">{}: </span>", escape_text(title)));
            }
            for label in &descriptor.labels {
                html.push_str(&colors.label_markup(label));
            }
            html.push_str("</div>");

            let data = LabelListData {
                labels: descriptor.labels.clone(),
                colors: colors.clone(),
            };
            let mounted = mount(
                rt,
                id,
                &html,
                container,
                position,
                &descriptor.common.listeners,
                |_, _| WidgetData::LabelList(data),
            );
            if mounted.is_some() {
                ids.push(id);
            }
        }
        Self { ids }
    }

    /// Append a label to one list or to all of them.
    pub fn add(&self, rt: &mut Runtime, label: &str, target: Option<WidgetId>) {
        for id in self.targets(target) {
            let Some(record) = rt.registry().find(&id) else {
                continue;
            };
            let node = record.node;
            let Some(data) = record.data.as_label_list() else {
                continue;
            };
            let markup = data.colors.label_markup(label);
            if let Err(err) = rt.insert(&markup, node, None) {
                log::error!("could not add label to {id}: {err}");
                continue;
            }
            if let Some(data) = rt
                .registry_mut()
                .find_mut(&id)
                .and_then(|r| r.data.as_label_list_mut())
            {
                data.labels.push(label.to_string());
            }
        }
    }

    /// Remove the first occurrence of `label` from one list or all of them.
    /// Lists without that label are left alone.
    pub fn remove(&self, rt: &mut Runtime, label: &str, target: Option<WidgetId>) {
        for id in self.targets(target) {
            let Some(record) = rt.registry_mut().find_mut(&id) else {
                continue;
            };
            let node = record.node;
            let Some(data) = record.data.as_label_list_mut() else {
                continue;
            };
            let Some(index) = data.labels.iter().position(|l| l == label) else {
                continue;
            };
            data.labels.remove(index);

            let spans = rt.document().select(node, ".label").unwrap_or_default();
            if let Some(&span) = spans.get(index) {
                rt.document_mut().detach(span);
            }
        }
    }

    pub fn labels<'a>(&self, rt: &'a Runtime, id: WidgetId) -> Option<&'a [String]> {
        Some(&rt.registry().find(&id)?.data.as_label_list()?.labels)
    }
}

impl Widget for LabelList {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
