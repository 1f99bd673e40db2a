//! Plain clickable text block.

use serde::Deserialize;

use crate::descriptor::{lenient, Common};
use crate::id::WidgetId;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_button";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonDescriptor {
    #[serde(flatten)]
    pub common: Common,
    /// Inner markup of the button.
    #[serde(deserialize_with = "lenient")]
    pub text: String,
}

impl ButtonDescriptor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn markup(&self, id: WidgetId) -> String {
        format!(
            "<div{}{} data-hash=\"{id}\">{}</div>",
            self.common.id_attr(),
            self.common.class_attr(),
            self.text
        )
    }
}

#[derive(Debug, Clone)]
pub struct Button {
    ids: Vec<WidgetId>,
}

impl Button {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: ButtonDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        let containers = descriptor.common.restrict(rt.containers(container));

        let mut ids = Vec::new();
        for container in containers {
            let id = WidgetId::new();
            let text = descriptor.text.clone();
            let mounted = mount(
                rt,
                id,
                &descriptor.markup(id),
                container,
                position,
                &descriptor.common.listeners,
                |_, _| WidgetData::Button { text },
            );
            if mounted.is_some() {
                ids.push(id);
            }
        }
        Self { ids }
    }

    /// Replace the content of one button, or of every button when `target`
    /// is `None`.
    pub fn change_text(&self, rt: &mut Runtime, text: &str, target: Option<WidgetId>) {
        for id in self.targets(target) {
            let Some(node) = rt.registry().find(&id).map(|r| r.node) else {
                continue;
            };
            if let Err(err) = rt.document_mut().set_inner_html(node, text) {
                log::error!("could not change text of {id}: {err}");
                continue;
            }
            if let Some(record) = rt.registry_mut().find_mut(&id) {
                record.data = WidgetData::Button {
                    text: text.to_string(),
                };
            }
        }
    }
}

impl Widget for Button {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
